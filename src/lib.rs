//! Decoder for Lua 5.1 `luac` chunks.
//!
//! [`decode`] validates the header and turns the main function and every
//! nested function into a [`Prototype`] tree. Nothing is executed or verified.

pub mod parser;

pub use parser::bytecode::{Instruction, InstructionDetail, InstructionFormat, Opcode};
pub use parser::constants::Constant;
pub use parser::error::{DecodeError, HeaderField};
pub use parser::function::Prototype;
pub use parser::header::{Header, SizeWidth};
pub use parser::{Chunk, DEFAULT_MAX_DEPTH, DecodeOptions, Utf8Policy, decode};
