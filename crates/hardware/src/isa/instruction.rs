//! Decoded instruction records.
//!
//! An [`Instruction`] is what the issue stage consumes: an opcode, an optional
//! destination register, and the source operands in one of three shapes
//! (two registers, register plus immediate, or a memory reference).

use std::fmt;

use crate::common::ArchReg;
use crate::isa::opcode::Opcode;

/// Source operands of an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sources {
    /// `rs, rt`.
    Registers(ArchReg, ArchReg),
    /// `rs, imm`.
    Immediate(ArchReg, i64),
    /// `off(base)`, plus the register whose value is stored (stores only).
    Memory {
        /// Constant offset, scaled at address generation.
        offset: i64,
        /// Base address register.
        base: ArchReg,
        /// Register holding the value to store; `None` for loads.
        data: Option<ArchReg>,
    },
}

/// A decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Instruction {
    /// Operation.
    pub opcode: Opcode,
    /// Destination register; `None` for stores.
    pub dest: Option<ArchReg>,
    /// Source operands.
    pub sources: Sources,
}

impl Instruction {
    /// Builds a three-register arithmetic instruction.
    pub fn arith(opcode: Opcode, rd: ArchReg, rs: ArchReg, rt: ArchReg) -> Self {
        Self {
            opcode,
            dest: Some(rd),
            sources: Sources::Registers(rs, rt),
        }
    }

    /// Builds `ADDI rd, rs, imm`.
    pub fn addi(rd: ArchReg, rs: ArchReg, imm: i64) -> Self {
        Self {
            opcode: Opcode::Addi,
            dest: Some(rd),
            sources: Sources::Immediate(rs, imm),
        }
    }

    /// Builds `LD rd, offset(base)`.
    pub fn load(rd: ArchReg, offset: i64, base: ArchReg) -> Self {
        Self {
            opcode: Opcode::Ld,
            dest: Some(rd),
            sources: Sources::Memory {
                offset,
                base,
                data: None,
            },
        }
    }

    /// Builds `SD rs, offset(base)`.
    pub fn store(rs: ArchReg, offset: i64, base: ArchReg) -> Self {
        Self {
            opcode: Opcode::Sd,
            dest: None,
            sources: Sources::Memory {
                offset,
                base,
                data: Some(rs),
            },
        }
    }

    /// Destination and source registers, destination first.
    pub fn registers(&self) -> impl Iterator<Item = ArchReg> + '_ {
        self.dest.into_iter().chain(self.read_registers())
    }

    /// Registers read by this instruction, in operand order.
    pub fn read_registers(&self) -> Vec<ArchReg> {
        match self.sources {
            Sources::Registers(rs, rt) => vec![rs, rt],
            Sources::Immediate(rs, _) => vec![rs],
            Sources::Memory { base, data, .. } => data.into_iter().chain([base]).collect(),
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.dest, self.sources) {
            (Some(rd), Sources::Registers(rs, rt)) => {
                write!(f, "{} {rd}, {rs}, {rt}", self.opcode)
            }
            (Some(rd), Sources::Immediate(rs, imm)) => {
                write!(f, "{} {rd}, {rs}, {imm}", self.opcode)
            }
            (Some(rd), Sources::Memory { offset, base, .. }) => {
                write!(f, "{} {rd}, {offset}({base})", self.opcode)
            }
            (None, Sources::Memory { offset, base, data }) => match data {
                Some(rs) => write!(f, "{} {rs}, {offset}({base})", self.opcode),
                None => write!(f, "{} {offset}({base})", self.opcode),
            },
            (None, _) => write!(f, "{}", self.opcode),
        }
    }
}
