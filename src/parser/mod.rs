pub mod bytecode;
pub mod constants;
mod debug;
pub mod error;
pub mod function;
pub mod header;
mod parsers;
pub mod reader;

#[cfg(test)]
pub(crate) mod testutil;

pub use header::parse_header;

use std::fmt;

use error::DecodeError;
use function::{Prototype, parse_function};
use header::{Header, SizeWidth};
use log::debug;
use reader::Reader;

/// Nesting limit used when none is configured (LUAI_MAXCCALLS in Lua 5.1)
pub const DEFAULT_MAX_DEPTH: usize = 200;

/// What to do with string bytes that are not valid UTF-8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Utf8Policy {
    /// Substitute U+FFFD and log a warning
    #[default]
    Replace,
    /// Fail with `DecodeError::InvalidUtf8`
    Reject,
}

/// Options for a single `decode` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Attach opcode number, name and format to every instruction
    pub verbose_instructions: bool,
    /// Deepest function nesting accepted; the main function is depth 0
    pub max_depth: usize,
    pub utf8: Utf8Policy,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            verbose_instructions: false,
            max_depth: DEFAULT_MAX_DEPTH,
            utf8: Utf8Policy::Replace,
        }
    }
}

impl DecodeOptions {
    pub fn verbose_instructions(mut self, verbose: bool) -> Self {
        self.verbose_instructions = verbose;
        self
    }

    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn utf8(mut self, policy: Utf8Policy) -> Self {
        self.utf8 = policy;
        self
    }
}

/// Per-call settings shared by every nested function. Fixed once the header
/// has been read; the cursor itself lives in `Reader`.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DecodeContext<'o> {
    pub width: SizeWidth,
    pub options: &'o DecodeOptions,
}

/// A decoded chunk: the main function and the buffer it came from
#[derive(Clone, PartialEq)]
pub struct Chunk<'a> {
    pub header: Header,
    pub main: Prototype,
    pub bytes: &'a [u8],
}

impl fmt::Debug for Chunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("header", &self.header)
            .field("main", &self.main)
            .field("bytes", &format_args!("<{} bytes>", self.bytes.len()))
            .finish()
    }
}

/// Main entry point for decoding Lua 5.1 bytecode
pub fn decode<'a>(input: &'a [u8], options: &DecodeOptions) -> Result<Chunk<'a>, DecodeError> {
    let mut reader = Reader::new(input);
    let header = parse_header(&mut reader)?;
    let ctx = DecodeContext {
        width: header.size_size_t,
        options,
    };
    let main = parse_function(&mut reader, &ctx, 0)?;

    // Check for any remaining bytes after parsing
    if reader.remaining() != 0 {
        return Err(DecodeError::TrailingBytes {
            offset: reader.offset(),
            remaining: reader.remaining(),
        });
    }

    debug!(
        "Decoded {} byte chunk ({}-byte size_t): {} functions",
        input.len(),
        header.size_size_t.bytes(),
        main.descendants() + 1
    );

    Ok(Chunk {
        header,
        main,
        bytes: input,
    })
}
