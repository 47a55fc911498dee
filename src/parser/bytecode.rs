/*
  Instruction words and the Lua 5.1 opcode table
*/

use num_enum::TryFromPrimitive;

//////////////////////////////// Variables ////////////////////////////////

// lopcodes.h:211
pub const TOTAL_OPS: u8 = 38;

//////////////////////////////// Structs ////////////////////////////////

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum InstructionFormat {
    IABC,
    IABx,
    IAsBx,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
#[rustfmt::skip]
#[repr(u8)]
pub enum Opcode {
    MOVE,     LOADK,     LOADBOOL, LOADNIL,
    GETUPVAL, GETGLOBAL, GETTABLE, SETGLOBAL,
    SETUPVAL, SETTABLE,  NEWTABLE, SELF,
    ADD,      SUB,       MUL,      DIV,
    MOD,      POW,       UNM,      NOT,
    LEN,      CONCAT,    JMP,      EQ,
    LT,       LE,        TEST,     TESTSET,
    CALL,     TAILCALL,  RETURN,   FORLOOP,
    FORPREP,  TFORLOOP,  SETLIST,  CLOSE,
    CLOSURE,  VARARG,
}

impl Opcode {
    pub fn name(self) -> &'static str {
        OPNAMES[self as usize]
    }

    pub fn format(self) -> InstructionFormat {
        OPMODES[self as usize]
    }
}

/// Table lookup for an instruction, filled in when verbose decoding is on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstructionDetail {
    pub opcode: u8,                        // Low 6 bits of the word (0-63)
    pub name: Option<&'static str>,        // None past the end of the table
    pub format: Option<InstructionFormat>, // None past the end of the table
}

impl InstructionDetail {
    pub fn lookup(opcode: u8) -> Self {
        let op = Opcode::try_from(opcode).ok();
        Self {
            opcode,
            name: op.map(Opcode::name),
            format: op.map(Opcode::format),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub raw: u32,
    pub detail: Option<InstructionDetail>,
}

impl Instruction {
    pub const SIZE_OP: u32 = 6;
    pub const SIZE_C: u32 = 9;
    pub const SIZE_B: u32 = 9;
    pub const SIZE_A: u32 = 8;
    pub const SIZE_BX: u32 = Instruction::SIZE_C + Instruction::SIZE_B;

    pub const POS_OP: u32 = 0;
    pub const POS_A: u32 = Instruction::POS_OP + Instruction::SIZE_OP;
    pub const POS_C: u32 = Instruction::POS_A + Instruction::SIZE_A;
    pub const POS_B: u32 = Instruction::POS_C + Instruction::SIZE_C;
    pub const POS_BX: u32 = Instruction::POS_C;

    pub const MAXARG_SBX: i32 = ((1 << Instruction::SIZE_BX) - 1) >> 1;

    /// A bare word, as produced when verbose decoding is off
    pub const fn new(raw: u32) -> Self {
        Self { raw, detail: None }
    }

    /// A word together with its opcode table entry
    pub fn verbose(raw: u32) -> Self {
        let mut instr = Self::new(raw);
        instr.detail = Some(InstructionDetail::lookup(instr.opcode()));
        instr
    }

    // Utility Functions //
    const fn extract_bits(pos: u32, size: u32, value: u32) -> u32 {
        (value >> pos) & ((1 << size) - 1)
    }

    // Instruction Info //
    pub const fn opcode(&self) -> u8 {
        Self::extract_bits(Instruction::POS_OP, Instruction::SIZE_OP, self.raw) as u8
    }

    pub fn op(&self) -> Option<Opcode> {
        Opcode::try_from(self.opcode()).ok()
    }

    // Operands //
    pub const fn a(&self) -> u32 {
        Self::extract_bits(Instruction::POS_A, Instruction::SIZE_A, self.raw)
    }

    pub const fn b(&self) -> u32 {
        Self::extract_bits(Instruction::POS_B, Instruction::SIZE_B, self.raw)
    }

    pub const fn c(&self) -> u32 {
        Self::extract_bits(Instruction::POS_C, Instruction::SIZE_C, self.raw)
    }

    pub const fn bx(&self) -> u32 {
        Self::extract_bits(Instruction::POS_BX, Instruction::SIZE_BX, self.raw)
    }

    pub const fn sbx(&self) -> i32 {
        self.bx() as i32 - Instruction::MAXARG_SBX
    }
}

//////////////////////////////// Lookup Tables ////////////////////////////////

#[rustfmt::skip]
const OPMODES: [InstructionFormat; TOTAL_OPS as usize] = [
    InstructionFormat::IABC,  // OP_MOVE
    InstructionFormat::IABx,  // OP_LOADK
    InstructionFormat::IABC,  // OP_LOADBOOL
    InstructionFormat::IABC,  // OP_LOADNIL
    InstructionFormat::IABC,  // OP_GETUPVAL
    InstructionFormat::IABx,  // OP_GETGLOBAL
    InstructionFormat::IABC,  // OP_GETTABLE
    InstructionFormat::IABx,  // OP_SETGLOBAL
    InstructionFormat::IABC,  // OP_SETUPVAL
    InstructionFormat::IABC,  // OP_SETTABLE
    InstructionFormat::IABC,  // OP_NEWTABLE
    InstructionFormat::IABC,  // OP_SELF
    InstructionFormat::IABC,  // OP_ADD
    InstructionFormat::IABC,  // OP_SUB
    InstructionFormat::IABC,  // OP_MUL
    InstructionFormat::IABC,  // OP_DIV
    InstructionFormat::IABC,  // OP_MOD
    InstructionFormat::IABC,  // OP_POW
    InstructionFormat::IABC,  // OP_UNM
    InstructionFormat::IABC,  // OP_NOT
    InstructionFormat::IABC,  // OP_LEN
    InstructionFormat::IABC,  // OP_CONCAT
    InstructionFormat::IAsBx, // OP_JMP
    InstructionFormat::IABC,  // OP_EQ
    InstructionFormat::IABC,  // OP_LT
    InstructionFormat::IABC,  // OP_LE
    InstructionFormat::IABC,  // OP_TEST
    InstructionFormat::IABC,  // OP_TESTSET
    InstructionFormat::IABC,  // OP_CALL
    InstructionFormat::IABC,  // OP_TAILCALL
    InstructionFormat::IABC,  // OP_RETURN
    InstructionFormat::IAsBx, // OP_FORLOOP
    InstructionFormat::IAsBx, // OP_FORPREP
    InstructionFormat::IABC,  // OP_TFORLOOP
    InstructionFormat::IABC,  // OP_SETLIST
    InstructionFormat::IABC,  // OP_CLOSE
    InstructionFormat::IABx,  // OP_CLOSURE
    InstructionFormat::IABC,  // OP_VARARG
];

#[rustfmt::skip]
const OPNAMES: [&str; TOTAL_OPS as usize] = [
    "MOVE",     "LOADK",     "LOADBOOL", "LOADNIL",
    "GETUPVAL", "GETGLOBAL", "GETTABLE", "SETGLOBAL",
    "SETUPVAL", "SETTABLE",  "NEWTABLE", "SELF",
    "ADD",      "SUB",       "MUL",      "DIV",
    "MOD",      "POW",       "UNM",      "NOT",
    "LEN",      "CONCAT",    "JMP",      "EQ",
    "LT",       "LE",        "TEST",     "TESTSET",
    "CALL",     "TAILCALL",  "RETURN",   "FORLOOP",
    "FORPREP",  "TFORLOOP",  "SETLIST",  "CLOSE",
    "CLOSURE",  "VARARG",
];
