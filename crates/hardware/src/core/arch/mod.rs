//! Architected state.
//!
//! The committed register file and data memory sit outside the scheduling
//! logic: the engine reads them at issue and writes them at commit, and
//! never looks at them otherwise. This module contains:
//! 1. **Traits:** `RegisterStore` and `MemoryStore`, the seams the engine is generic over.
//! 2. **Register file:** Two 32-entry banks (`R` and `F`).
//! 3. **Memory:** A sparse word-addressed store.

/// Sparse word-addressed data memory.
pub mod memory;

/// Architected register file.
pub mod regfile;

/// Collaborator traits for committed state.
pub mod traits;

pub use memory::Memory;
pub use regfile::ArchRegisterFile;
pub use traits::{MemoryStore, RegisterStore};
