//! Instruction set definitions.
//!
//! The simulated machine understands a small load/store instruction set:
//! integer add/subtract/add-immediate, floating-point add/subtract/multiply/divide,
//! and word loads and stores with `off(base)` addressing.
//!
//! * `opcode`: The operation set and the functional-unit class each operation needs.
//! * `instruction`: The decoded instruction record handed to the issue stage.
//! * `decode`: Text-to-instruction decoding used by the program loader.

/// Instruction text decoding.
pub mod decode;

/// Decoded instruction records.
pub mod instruction;

/// Opcodes and functional-unit classes.
pub mod opcode;

pub use instruction::{Instruction, Sources};
pub use opcode::{Opcode, UnitClass};
