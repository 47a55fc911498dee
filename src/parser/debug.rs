//! Debug sections (line info, local names, upvalue names).
//!
//! `luac` writes them after the nested functions. Nothing in them is kept,
//! but each one has to be walked exactly or every later field is misread.

use super::DecodeContext;
use super::error::DecodeError;
use super::parsers::skip_string;
use super::reader::Reader;

const LINEINFO_ENTRY_SIZE: usize = 4;

/// Skip the per-instruction line numbers as a single block
fn skip_lineinfo(reader: &mut Reader<'_>) -> Result<(), DecodeError> {
    let offset = reader.offset();
    let count = reader.read_u32()?;
    let len = usize::try_from(count)
        .ok()
        .and_then(|n| n.checked_mul(LINEINFO_ENTRY_SIZE))
        .ok_or(DecodeError::Range {
            offset,
            value: u64::from(count) * LINEINFO_ENTRY_SIZE as u64,
        })?;
    reader.skip(len)
}

/// Skip `(varname, startpc, endpc)` records
fn skip_locals(reader: &mut Reader<'_>, ctx: &DecodeContext<'_>) -> Result<(), DecodeError> {
    let count = reader.read_u32()?;
    for _ in 0..count {
        skip_string(reader, ctx)?;
        reader.read_u32()?;
        reader.read_u32()?;
    }
    Ok(())
}

fn skip_upvalue_names(
    reader: &mut Reader<'_>,
    ctx: &DecodeContext<'_>,
) -> Result<(), DecodeError> {
    let count = reader.read_u32()?;
    for _ in 0..count {
        skip_string(reader, ctx)?;
    }
    Ok(())
}

pub fn skip_debug_info(
    reader: &mut Reader<'_>,
    ctx: &DecodeContext<'_>,
) -> Result<(), DecodeError> {
    skip_lineinfo(reader)?;
    skip_locals(reader, ctx)?;
    skip_upvalue_names(reader, ctx)
}
