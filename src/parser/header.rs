use super::error::{DecodeError, HeaderField};
use super::reader::Reader;
use log::debug;
use num_enum::TryFromPrimitive;

// Constants for validation
const MAGIC_NUMBER: &[u8] = b"\x1BLua";
const EXPECTED_VERSION: u8 = 0x51;
const EXPECTED_FORMAT: u8 = 0;
const EXPECTED_ENDIANNESS: u8 = 1;
const EXPECTED_SIZE_INT: u8 = 4;
const EXPECTED_SIZE_INSTRUCTION: u8 = 4;
const EXPECTED_SIZE_NUMBER: u8 = 8;
const EXPECTED_INTEGRAL_FLAG: u8 = 0;

/// Width of every `size_t` field in a chunk (string lengths)
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[repr(u8)]
pub enum SizeWidth {
    Four = 4,
    Eight = 8,
}

impl SizeWidth {
    pub const fn bytes(self) -> usize {
        self as usize
    }
}

/// Header metadata describing the bytecode format and target architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub version: u8,            // Lua version (0x51 for Lua 5.1)
    pub format: u8,             // Bytecode format (0 for official Lua bytecode)
    pub size_int: u8,           // Size of an integer in bytes
    pub size_size_t: SizeWidth, // Size of a size_t value in bytes
    pub size_instruction: u8,   // Size of an instruction in bytes
    pub size_number: u8,        // Size of a number in bytes
}

/// Header parsing helpers
mod parsers {
    use super::*;

    pub fn parse_magic_number(reader: &mut Reader<'_>) -> Result<(), DecodeError> {
        let available = reader.peek_rest();
        let seen = &available[..available.len().min(MAGIC_NUMBER.len())];
        if !MAGIC_NUMBER.starts_with(seen) {
            return Err(DecodeError::Format {
                field: HeaderField::Signature,
                offset: reader.offset(),
                expected: "\\x1bLua",
                found: seen.to_vec(),
            });
        }
        reader.skip(MAGIC_NUMBER.len())
    }

    /// Reads one header byte and checks it with `accept`
    pub fn parse_byte(
        reader: &mut Reader<'_>,
        field: HeaderField,
        expected: &'static str,
        accept: impl Fn(u8) -> bool,
    ) -> Result<u8, DecodeError> {
        let offset = reader.offset();
        let value = reader.read_u8()?;
        if !accept(value) {
            return Err(DecodeError::Format {
                field,
                offset,
                expected,
                found: vec![value],
            });
        }
        Ok(value)
    }

    pub fn parse_size(
        reader: &mut Reader<'_>,
        field: HeaderField,
        expected: u8,
        expected_text: &'static str,
    ) -> Result<u8, DecodeError> {
        parse_byte(reader, field, expected_text, |v| v == expected)
    }

    pub fn parse_size_t_width(reader: &mut Reader<'_>) -> Result<SizeWidth, DecodeError> {
        let offset = reader.offset();
        let value = reader.read_u8()?;
        SizeWidth::try_from(value).map_err(|_| DecodeError::Format {
            field: HeaderField::SizeTSize,
            offset,
            expected: "4 or 8",
            found: vec![value],
        })
    }
}

use parsers::*;

/// Parse the 12-byte chunk header, stopping at the first field that does not
/// describe a little-endian, double-number Lua 5.1 chunk.
pub fn parse_header(reader: &mut Reader<'_>) -> Result<Header, DecodeError> {
    parse_magic_number(reader)?;
    let version = parse_size(reader, HeaderField::Version, EXPECTED_VERSION, "0x51")?;
    let format = parse_size(reader, HeaderField::Format, EXPECTED_FORMAT, "0 (official)")?;
    parse_size(
        reader,
        HeaderField::Endianness,
        EXPECTED_ENDIANNESS,
        "1 (little endian)",
    )?;

    let size_int = parse_size(reader, HeaderField::IntSize, EXPECTED_SIZE_INT, "4")?;
    let size_size_t = parse_size_t_width(reader)?;
    let size_instruction = parse_size(
        reader,
        HeaderField::InstructionSize,
        EXPECTED_SIZE_INSTRUCTION,
        "4",
    )?;
    let size_number = parse_size(reader, HeaderField::NumberSize, EXPECTED_SIZE_NUMBER, "8")?;
    parse_size(
        reader,
        HeaderField::IntegralFlag,
        EXPECTED_INTEGRAL_FLAG,
        "0 (floating point numbers)",
    )?;

    let header = Header {
        version,
        format,
        size_int,
        size_size_t,
        size_instruction,
        size_number,
    };

    debug!("Parsed header: {:?}", header);

    Ok(header)
}
