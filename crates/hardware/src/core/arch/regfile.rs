//! Architected register file.
//!
//! This module implements the committed register state. It performs the following:
//! 1. **Storage:** Maintains 32 integer registers (`R0`-`R31`) and 32 floating-point
//!    registers (`F0`-`F31`).
//! 2. **Seeding:** Accepts initial values before the simulation starts.
//! 3. **Debugging:** Lists registers that hold something other than zero.

use crate::common::reg::REGS_PER_BANK;
use crate::common::{ArchReg, Value};
use crate::core::arch::traits::RegisterStore;

/// Committed register values, one bank per register class.
#[derive(Clone, Debug, PartialEq)]
pub struct ArchRegisterFile {
    int: [Value; REGS_PER_BANK],
    fp: [Value; REGS_PER_BANK],
}

impl Default for ArchRegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchRegisterFile {
    /// Creates a register file with every register holding integer zero.
    pub fn new() -> Self {
        Self {
            int: [Value::Int(0); REGS_PER_BANK],
            fp: [Value::Int(0); REGS_PER_BANK],
        }
    }

    /// Returns the registers whose value is non-zero, integer bank first.
    pub fn non_zero(&self) -> Vec<(ArchReg, Value)> {
        let int = self
            .int
            .iter()
            .enumerate()
            .map(|(i, v)| (ArchReg::Int(i as u8), *v));
        let fp = self
            .fp
            .iter()
            .enumerate()
            .map(|(i, v)| (ArchReg::Fp(i as u8), *v));
        int.chain(fp).filter(|(_, v)| !v.is_zero()).collect()
    }
}

impl RegisterStore for ArchRegisterFile {
    fn read(&self, reg: ArchReg) -> Value {
        match reg {
            ArchReg::Int(n) => self.int[n as usize],
            ArchReg::Fp(n) => self.fp[n as usize],
        }
    }

    fn write(&mut self, reg: ArchReg, value: Value) {
        match reg {
            ArchReg::Int(n) => self.int[n as usize] = value,
            ArchReg::Fp(n) => self.fp[n as usize] = value,
        }
    }
}
