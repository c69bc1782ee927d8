//! Sparse word-addressed data memory.
//!
//! Cells that were never written read as integer zero, so the map only holds
//! addresses a program seeded or stored to.

use std::collections::BTreeMap;

use crate::common::{MemAddr, Value};
use crate::core::arch::traits::MemoryStore;

/// Committed data memory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Memory {
    cells: BTreeMap<MemAddr, Value>,
}

impl Memory {
    /// Creates an empty memory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every non-zero cell in address order.
    pub fn non_zero(&self) -> Vec<(MemAddr, Value)> {
        self.cells
            .iter()
            .filter(|(_, v)| !v.is_zero())
            .map(|(a, v)| (*a, *v))
            .collect()
    }
}

impl MemoryStore for Memory {
    fn read(&self, addr: MemAddr) -> Value {
        self.cells.get(&addr).copied().unwrap_or_default()
    }

    fn write(&mut self, addr: MemAddr, value: Value) {
        let _ = self.cells.insert(addr, value);
    }
}
