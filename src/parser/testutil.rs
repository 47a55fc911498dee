//! Byte builders for hand-assembled chunks used by the unit tests

use super::bytecode::Instruction;
use super::constants::Constant;
use super::function::Prototype;
use super::header::SizeWidth;

pub fn header_bytes(size_t: u8) -> Vec<u8> {
    vec![0x1b, b'L', b'u', b'a', 0x51, 0, 1, 4, size_t, 4, 8, 0]
}

pub fn chunk_bytes(width: SizeWidth, main: &FunctionBytes) -> Vec<u8> {
    let mut bytes = header_bytes(width as u8);
    bytes.extend(main.encode(width));
    bytes
}

pub struct ByteWriter {
    width: SizeWidth,
    bytes: Vec<u8>,
}

impl ByteWriter {
    pub fn new(width: SizeWidth) -> Self {
        Self {
            width,
            bytes: Vec::new(),
        }
    }

    pub fn byte(mut self, value: u8) -> Self {
        self.bytes.push(value);
        self
    }

    pub fn int(mut self, value: u32) -> Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn size(mut self, value: u64) -> Self {
        match self.width {
            SizeWidth::Four => self.bytes.extend_from_slice(&(value as u32).to_le_bytes()),
            SizeWidth::Eight => self.bytes.extend_from_slice(&value.to_le_bytes()),
        }
        self
    }

    pub fn number(mut self, value: f64) -> Self {
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    pub fn string(self, value: Option<&str>) -> Self {
        match value {
            None => self.size(0),
            Some(s) => self.size(s.len() as u64 + 1).raw(s.as_bytes()).byte(0),
        }
    }

    pub fn constant(self, constant: &Constant) -> Self {
        match constant {
            Constant::Nil => self.byte(0),
            Constant::Boolean(b) => self.byte(1).byte(u8::from(*b)),
            Constant::Number(n) => self.byte(3).number(*n),
            Constant::String(s) => self.byte(4).string(s.as_deref()),
        }
    }

    pub fn finish(self) -> Vec<u8> {
        self.bytes
    }
}

/// Source-level description of one function, debug sections included
#[derive(Debug, Clone, Default)]
pub struct FunctionBytes {
    pub source: Option<String>,
    pub line_defined: u32,
    pub last_line_defined: u32,
    pub num_upvalues: u8,
    pub num_params: u8,
    pub is_vararg: u8,
    pub max_stack_size: u8,
    pub code: Vec<u32>,
    pub constants: Vec<Constant>,
    pub children: Vec<FunctionBytes>,
    pub lineinfo: Vec<u32>,
    pub locals: Vec<(String, u32, u32)>,
    pub upvalue_names: Vec<String>,
}

impl FunctionBytes {
    pub fn write(&self, mut w: ByteWriter) -> ByteWriter {
        w = w
            .string(self.source.as_deref())
            .int(self.line_defined)
            .int(self.last_line_defined)
            .byte(self.num_upvalues)
            .byte(self.num_params)
            .byte(self.is_vararg)
            .byte(self.max_stack_size)
            .int(self.code.len() as u32);
        for word in &self.code {
            w = w.int(*word);
        }
        w = w.int(self.constants.len() as u32);
        for constant in &self.constants {
            w = w.constant(constant);
        }
        w = w.int(self.children.len() as u32);
        for child in &self.children {
            w = child.write(w);
        }
        w = w.int(self.lineinfo.len() as u32);
        for line in &self.lineinfo {
            w = w.int(*line);
        }
        w = w.int(self.locals.len() as u32);
        for (name, start, end) in &self.locals {
            w = w.string(Some(name.as_str())).int(*start).int(*end);
        }
        w = w.int(self.upvalue_names.len() as u32);
        for name in &self.upvalue_names {
            w = w.string(Some(name.as_str()));
        }
        w
    }

    pub fn encode(&self, width: SizeWidth) -> Vec<u8> {
        self.write(ByteWriter::new(width)).finish()
    }

    /// The prototype this description should decode to
    pub fn expected(&self, verbose: bool) -> Prototype {
        Prototype {
            source_name: self.source.clone(),
            line_defined: self.line_defined,
            last_line_defined: self.last_line_defined,
            num_upvalues: self.num_upvalues,
            num_params: self.num_params,
            is_vararg: self.is_vararg,
            max_stack_size: self.max_stack_size,
            code: self
                .code
                .iter()
                .map(|&w| if verbose { Instruction::verbose(w) } else { Instruction::new(w) })
                .collect(),
            constants: self.constants.clone(),
            prototypes: self.children.iter().map(|c| c.expected(verbose)).collect(),
        }
    }
}
