//! Register Alias Table (RAT) for register renaming.
//!
//! Maps each architectural register to the ROB tag of its latest in-flight
//! producer, or `None` if the value is in the architectural register file.
//! The issue stage does a single lookup per source operand and then binds
//! the destination to the new instruction's tag.

use crate::common::reg::REGS_PER_BANK;
use crate::common::ArchReg;
use crate::core::pipeline::rob::RobTag;

/// Register alias table: one optional producer tag per architectural register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RegisterAliasTable {
    /// Integer bank.
    int: [Option<RobTag>; REGS_PER_BANK],
    /// Floating-point bank.
    fp: [Option<RobTag>; REGS_PER_BANK],
}

impl Default for RegisterAliasTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterAliasTable {
    /// Create a new table with every register mapped to the register file.
    pub fn new() -> Self {
        Self {
            int: [None; REGS_PER_BANK],
            fp: [None; REGS_PER_BANK],
        }
    }

    fn slot_mut(&mut self, reg: ArchReg) -> &mut Option<RobTag> {
        match reg {
            ArchReg::Int(n) => &mut self.int[n as usize],
            ArchReg::Fp(n) => &mut self.fp[n as usize],
        }
    }

    /// Returns the tag of the latest pending writer of `reg`, or `None` when
    /// the committed value in the register file is current.
    pub fn rename(&self, reg: ArchReg) -> Option<RobTag> {
        match reg {
            ArchReg::Int(n) => self.int[n as usize],
            ArchReg::Fp(n) => self.fp[n as usize],
        }
    }

    /// Records that `reg`'s next value comes from `tag`, replacing any prior binding.
    pub fn bind(&mut self, reg: ArchReg, tag: RobTag) {
        *self.slot_mut(reg) = Some(tag);
    }

    /// Clears `reg`'s binding, but ONLY if it still names `tag`.
    /// A committing instruction must not clear a binding made by a newer writer.
    pub fn clear_if_current(&mut self, reg: ArchReg, tag: RobTag) {
        let slot = self.slot_mut(reg);
        if *slot == Some(tag) {
            *slot = None;
        }
    }

    /// Lists the live bindings, integer bank first.
    pub fn bindings(&self) -> Vec<(ArchReg, RobTag)> {
        let int = self
            .int
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|t| (ArchReg::Int(i as u8), t)));
        let fp = self
            .fp
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|t| (ArchReg::Fp(i as u8), t)));
        int.chain(fp).collect()
    }
}
