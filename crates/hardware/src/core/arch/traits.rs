//! Collaborator traits for committed state.
//!
//! The engine only ever needs a read and a write on each store, so any map
//! from register or address to [`Value`] can stand in for the defaults
//! (`ArchRegisterFile`, `Memory`), including test doubles.

use crate::common::{ArchReg, MemAddr, Value};

/// Committed register values.
pub trait RegisterStore {
    /// Returns the committed value of `reg`.
    fn read(&self, reg: ArchReg) -> Value;
    /// Overwrites the committed value of `reg`.
    fn write(&mut self, reg: ArchReg, value: Value);
}

/// Committed memory contents.
pub trait MemoryStore {
    /// Returns the committed value at `addr`.
    fn read(&self, addr: MemAddr) -> Value;
    /// Overwrites the committed value at `addr`.
    fn write(&mut self, addr: MemAddr, value: Value);
}
