use std::fmt;

use thiserror::Error;

/// Header byte that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Signature,
    Version,
    Format,
    Endianness,
    IntSize,
    SizeTSize,
    InstructionSize,
    NumberSize,
    IntegralFlag,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HeaderField::Signature => "signature",
            HeaderField::Version => "Lua version",
            HeaderField::Format => "chunk format",
            HeaderField::Endianness => "endianness",
            HeaderField::IntSize => "int size",
            HeaderField::SizeTSize => "size_t size",
            HeaderField::InstructionSize => "instruction size",
            HeaderField::NumberSize => "number size",
            HeaderField::IntegralFlag => "integral number flag",
        };
        f.write_str(name)
    }
}

/// Everything that can stop a chunk from decoding.
///
/// Every variant is terminal: the buffer is not a supported Lua 5.1 chunk and
/// no partial tree is returned. `offset` is always the byte position in the
/// input where the offending field starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("invalid {field} at offset {offset}: expected {expected}, found {found:02x?}")]
    Format {
        field: HeaderField,
        offset: usize,
        expected: &'static str,
        found: Vec<u8>,
    },

    #[error("truncated input at offset {offset}: needed {needed} bytes, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("size value {value} at offset {offset} does not fit in a host usize")]
    Range { offset: usize, value: u64 },

    #[error("unrecognized constant tag 0x{tag:02x} at offset {offset}")]
    UnrecognizedConstantTag { offset: usize, tag: u8 },

    #[error("string at offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    #[error("function nesting exceeds {limit} levels at offset {offset}")]
    NestingTooDeep { offset: usize, limit: usize },

    #[error("{remaining} trailing bytes after the main function at offset {offset}")]
    TrailingBytes { offset: usize, remaining: usize },
}

impl DecodeError {
    pub fn offset(&self) -> usize {
        match self {
            DecodeError::Format { offset, .. }
            | DecodeError::Truncated { offset, .. }
            | DecodeError::Range { offset, .. }
            | DecodeError::UnrecognizedConstantTag { offset, .. }
            | DecodeError::InvalidUtf8 { offset }
            | DecodeError::NestingTooDeep { offset, .. }
            | DecodeError::TrailingBytes { offset, .. } => *offset,
        }
    }
}
