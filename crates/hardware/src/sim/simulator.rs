//! Simulator: owns the engine together with the default committed state.
//!
//! The engine is generic over its register file and memory; the simulator
//! fixes them to [`ArchRegisterFile`] and [`Memory`], seeds them from a
//! [`Program`], and renders the report once the run finishes.

use std::path::Path;

use tracing::info;

use crate::common::SimError;
use crate::config::Config;
use crate::core::arch::{ArchRegisterFile, Memory, MemoryStore, RegisterStore};
use crate::core::{Engine, Status};
use crate::sim::loader::{self, Program};
use crate::sim::report;
use crate::stats::SimStats;

/// Top-level simulator: scheduling engine plus register file and memory.
#[derive(Debug)]
pub struct Simulator {
    engine: Engine<ArchRegisterFile, Memory>,
}

impl Simulator {
    /// Creates a simulator for `program`, seeding registers and memory.
    ///
    /// # Errors
    ///
    /// `Config` if the configuration fails validation, `MalformedRegister`
    /// for a seed or operand outside the register banks.
    pub fn new(config: Config, program: Program) -> Result<Self, SimError> {
        let mut regs = ArchRegisterFile::new();
        for (reg, value) in program.registers {
            regs.write(reg.validate()?, value);
        }
        let mut mem = Memory::new();
        for (addr, value) in program.memory {
            mem.write(addr, value);
        }
        let engine = Engine::new(config, program.instructions, regs, mem)?;
        Ok(Self { engine })
    }

    /// Loads a program file and creates a simulator for it.
    ///
    /// # Errors
    ///
    /// Any loading or decoding error, or an invalid configuration.
    pub fn from_file(config: Config, path: impl AsRef<Path>) -> Result<Self, SimError> {
        let program = loader::load_program(path)?;
        Self::new(config, program)
    }

    /// Advances the simulator by one clock cycle.
    pub fn tick(&mut self) -> Result<Status, SimError> {
        self.engine.tick()
    }

    /// Runs until the reorder buffer drains.
    ///
    /// Returns the number of cycles in which the engine did work.
    pub fn run(&mut self) -> Result<u64, SimError> {
        let cycles = self.engine.run()?;
        info!(
            cycles,
            committed = self.engine.stats().instructions_committed,
            "simulation finished"
        );
        Ok(cycles)
    }

    /// The scheduling engine.
    pub fn engine(&self) -> &Engine<ArchRegisterFile, Memory> {
        &self.engine
    }

    /// Statistics collected so far.
    pub fn stats(&self) -> &SimStats {
        self.engine.stats()
    }

    /// Renders the timing table, the registers and the memory.
    pub fn report(&self) -> String {
        report::render(&self.engine)
    }
}
