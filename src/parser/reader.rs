use super::error::DecodeError;
use super::header::SizeWidth;
use nom::{
    Parser,
    bytes::complete::take,
    number::complete::{le_f64, le_u8, le_u32, le_u64},
};

type NomError<'a> = nom::error::Error<&'a [u8]>;

/// Forward-only cursor over a chunk buffer.
///
/// Each primitive runs a nom complete-input parser on the unread tail, so a
/// read that would run past the end fails instead of yielding partial data.
#[derive(Debug, Clone)]
pub struct Reader<'a> {
    input: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// Position of the next unread byte
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.input.len() - self.offset
    }

    /// Unread tail, without consuming it
    pub fn peek_rest(&self) -> &'a [u8] {
        let input = self.input;
        &input[self.offset..]
    }

    /// Fails with `Truncated` unless `needed` more bytes are available
    pub fn ensure(&self, needed: usize) -> Result<(), DecodeError> {
        if needed > self.remaining() {
            return Err(DecodeError::Truncated {
                offset: self.offset,
                needed,
                available: self.remaining(),
            });
        }
        Ok(())
    }

    fn run<T, P>(&mut self, needed: usize, mut parser: P) -> Result<T, DecodeError>
    where
        P: Parser<&'a [u8], Output = T, Error = NomError<'a>>,
    {
        self.ensure(needed)?;
        let input = self.peek_rest();
        match parser.parse(input) {
            Ok((rest, value)) => {
                self.offset += input.len() - rest.len();
                Ok(value)
            }
            Err(_) => Err(DecodeError::Truncated {
                offset: self.offset,
                needed,
                available: input.len(),
            }),
        }
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        self.run(1, le_u8::<_, NomError<'a>>)
    }

    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        self.run(4, le_u32::<_, NomError<'a>>)
    }

    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        self.run(8, le_u64::<_, NomError<'a>>)
    }

    pub fn read_f64(&mut self) -> Result<f64, DecodeError> {
        self.run(8, le_f64::<_, NomError<'a>>)
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        self.run(len, take::<_, _, NomError<'a>>(len))
    }

    pub fn skip(&mut self, len: usize) -> Result<(), DecodeError> {
        self.read_bytes(len).map(|_| ())
    }

    /// Reads a `size_t` field whose width was fixed by the chunk header
    pub fn read_size(&mut self, width: SizeWidth) -> Result<usize, DecodeError> {
        let offset = self.offset;
        let value = match width {
            SizeWidth::Four => u64::from(self.read_u32()?),
            SizeWidth::Eight => self.read_u64()?,
        };
        usize::try_from(value).map_err(|_| DecodeError::Range { offset, value })
    }
}
