use super::constants::Constant;
use super::error::DecodeError;
use super::reader::Reader;
use super::{DecodeContext, Utf8Policy};
use log::{trace, warn};

// lobject.h type tags as written by ldump.c
const TAG_NIL: u8 = 0;
const TAG_BOOLEAN: u8 = 1;
const TAG_NUMBER: u8 = 3;
const TAG_STRING: u8 = 4;

/// Reads a `size_t` string length and makes sure the payload is present
fn parse_string_len(
    reader: &mut Reader<'_>,
    ctx: &DecodeContext<'_>,
) -> Result<usize, DecodeError> {
    let len = reader.read_size(ctx.width)?;
    reader.ensure(len)?;
    Ok(len)
}

/// Parses a length-prefixed string with null terminator.
///
/// A zero length means no string at all (`None`); a genuine empty string is
/// stored as length 1 holding only the terminator. The terminator byte is
/// dropped without being checked.
pub fn parse_string(
    reader: &mut Reader<'_>,
    ctx: &DecodeContext<'_>,
) -> Result<Option<String>, DecodeError> {
    let len = parse_string_len(reader, ctx)?;
    if len == 0 {
        return Ok(None);
    }

    let offset = reader.offset();
    let bytes = reader.read_bytes(len)?;
    let text = &bytes[..len - 1];

    let decoded = match std::str::from_utf8(text) {
        Ok(s) => s.to_owned(),
        Err(_) => match ctx.options.utf8 {
            Utf8Policy::Reject => return Err(DecodeError::InvalidUtf8 { offset }),
            Utf8Policy::Replace => {
                warn!("string at offset {offset} is not valid UTF-8; replacing invalid bytes");
                String::from_utf8_lossy(text).into_owned()
            }
        },
    };

    Ok(Some(decoded))
}

/// Skips a string whose contents are not kept (debug names)
pub fn skip_string(reader: &mut Reader<'_>, ctx: &DecodeContext<'_>) -> Result<(), DecodeError> {
    let len = parse_string_len(reader, ctx)?;
    reader.skip(len)
}

/// Parses a constant value from the bytecode
pub fn parse_constant(
    reader: &mut Reader<'_>,
    ctx: &DecodeContext<'_>,
) -> Result<Constant, DecodeError> {
    let offset = reader.offset();
    let tag = reader.read_u8()?;
    let constant = match tag {
        TAG_NIL => Constant::Nil,
        TAG_BOOLEAN => Constant::Boolean(reader.read_u8()? != 0),
        TAG_NUMBER => Constant::Number(reader.read_f64()?),
        TAG_STRING => Constant::String(parse_string(reader, ctx)?),
        _ => return Err(DecodeError::UnrecognizedConstantTag { offset, tag }),
    };

    trace!("constant at offset {offset}: {} {:?}", constant.type_name(), constant);

    Ok(constant)
}
