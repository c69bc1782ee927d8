//! Common types shared by every part of the scheduling engine.
//!
//! This module provides the vocabulary the rest of the crate is written in:
//! 1. **Addresses:** A strong type for word addresses in data memory.
//! 2. **Errors:** The crate-wide [`SimError`] and the structures that can run out of capacity.
//! 3. **Registers:** Architectural register names (`R0`-`R31`, `F0`-`F31`).
//! 4. **Values:** Integer and floating-point data values moved between structures.

/// Memory address type definitions.
pub mod addr;

/// Error types for loading, configuring, and running a simulation.
pub mod error;

/// Architectural register names.
pub mod reg;

/// Data values carried by registers, memory, and the common data bus.
pub mod value;

pub use addr::MemAddr;
pub use error::{SimError, Structure};
pub use reg::ArchReg;
pub use value::Value;
