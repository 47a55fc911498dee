use super::DecodeContext;
use super::bytecode::Instruction;
use super::constants::Constant;
use super::debug::skip_debug_info;
use super::error::DecodeError;
use super::parsers::{parse_constant, parse_string};
use super::reader::Reader;

use log::debug;

// lobject.h VARARG_ISVARARG
const VARARG_ISVARARG: u8 = 2;

const INSTRUCTION_SIZE: usize = 4;

/// Represents a Lua function prototype
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub source_name: Option<String>, // Source file name, None when stripped
    pub line_defined: u32,           // Line number where the function is defined
    pub last_line_defined: u32,      // Last line number where the function is defined
    pub num_upvalues: u8,            // Number of upvalues
    pub num_params: u8,              // Number of parameters
    pub is_vararg: u8,               // Vararg flag bits, as written by the compiler
    pub max_stack_size: u8,          // Maximum stack size
    pub code: Vec<Instruction>,      // Bytecode instructions
    pub constants: Vec<Constant>,    // Constants used in the function
    pub prototypes: Vec<Prototype>,  // Nested function prototypes
}

impl Prototype {
    pub fn accepts_varargs(&self) -> bool {
        self.is_vararg & VARARG_ISVARARG != 0
    }

    /// Number of functions nested below this one, at any depth
    pub fn descendants(&self) -> usize {
        self.prototypes
            .iter()
            .map(|child| 1 + child.descendants())
            .sum()
    }
}

/// Parsing functions module
mod parsers {
    use super::*;

    /// Reads an `int` element count
    pub fn parse_count(reader: &mut Reader<'_>) -> Result<usize, DecodeError> {
        let offset = reader.offset();
        let count = reader.read_u32()?;
        usize::try_from(count).map_err(|_| DecodeError::Range {
            offset,
            value: u64::from(count),
        })
    }

    /// Helper function to parse a section with a length prefix
    pub fn parse_section<'a, T, F>(
        reader: &mut Reader<'a>,
        mut parser: F,
    ) -> Result<Vec<T>, DecodeError>
    where
        F: FnMut(&mut Reader<'a>) -> Result<T, DecodeError>,
    {
        let len = parse_count(reader)?;
        // every element takes at least one byte
        let mut items = Vec::with_capacity(len.min(reader.remaining()));
        for _ in 0..len {
            items.push(parser(reader)?);
        }
        Ok(items)
    }

    /// Parse the instruction block, checked against the input length up front
    pub fn parse_code(
        reader: &mut Reader<'_>,
        ctx: &DecodeContext<'_>,
    ) -> Result<Vec<Instruction>, DecodeError> {
        let count_offset = reader.offset();
        let len = parse_count(reader)?;
        let size = len.checked_mul(INSTRUCTION_SIZE).ok_or(DecodeError::Range {
            offset: count_offset,
            value: len as u64 * INSTRUCTION_SIZE as u64,
        })?;
        reader.ensure(size)?;

        let mut code = Vec::with_capacity(len);
        for _ in 0..len {
            let word = reader.read_u32()?;
            code.push(if ctx.options.verbose_instructions {
                Instruction::verbose(word)
            } else {
                Instruction::new(word)
            });
        }
        Ok(code)
    }
}

use parsers::*;

/// Parse a Lua function prototype.
///
/// `depth` is 0 for the main function; nested functions deeper than
/// `max_depth` are rejected before any of their fields are read.
pub(crate) fn parse_function(
    reader: &mut Reader<'_>,
    ctx: &DecodeContext<'_>,
    depth: usize,
) -> Result<Prototype, DecodeError> {
    let offset = reader.offset();
    if depth > ctx.options.max_depth {
        return Err(DecodeError::NestingTooDeep {
            offset,
            limit: ctx.options.max_depth,
        });
    }

    let source_name = parse_string(reader, ctx)?;
    let line_defined = reader.read_u32()?;
    let last_line_defined = reader.read_u32()?;
    let num_upvalues = reader.read_u8()?;
    let num_params = reader.read_u8()?;
    let is_vararg = reader.read_u8()?;
    let max_stack_size = reader.read_u8()?;

    let code = parse_code(reader, ctx)?;
    let constants = parse_section(reader, |r| parse_constant(r, ctx))?;
    let prototypes = parse_section(reader, |r| parse_function(r, ctx, depth + 1))?;
    skip_debug_info(reader, ctx)?;

    let proto = Prototype {
        source_name,
        line_defined,
        last_line_defined,
        num_upvalues,
        num_params,
        is_vararg,
        max_stack_size,
        code,
        constants,
        prototypes,
    };

    debug!(
        "Parsed function prototype at offset {offset} (depth {depth}): {} instructions, {} constants, {} nested",
        proto.code.len(),
        proto.constants.len(),
        proto.prototypes.len()
    );

    Ok(proto)
}
