//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer adder served by the `Int FU` class.
//! `ADD`, `SUB` and `ADDI` operate on 64-bit two's-complement values and
//! wrap on overflow.

use crate::isa::Opcode;

/// Arithmetic Logic Unit (ALU) for integer operations.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes an integer operation.
    ///
    /// # Arguments
    ///
    /// * `op` - The operation to perform
    /// * `a`  - First operand
    /// * `b`  - Second operand (the immediate for `ADDI`)
    ///
    /// # Returns
    ///
    /// The wrapped 64-bit result, or `None` for an opcode the ALU does not serve.
    ///
    /// # Examples
    ///
    /// ```
    /// use tomasim_core::core::units::alu::Alu;
    /// use tomasim_core::isa::Opcode;
    ///
    /// assert_eq!(Alu::execute(Opcode::Add, 42, 8), Some(50));
    /// assert_eq!(Alu::execute(Opcode::Sub, i64::MIN, 1), Some(i64::MAX));
    /// ```
    #[inline]
    pub fn execute(op: Opcode, a: i64, b: i64) -> Option<i64> {
        match op {
            Opcode::Add | Opcode::Addi => Some(a.wrapping_add(b)),
            Opcode::Sub => Some(a.wrapping_sub(b)),
            _ => None,
        }
    }
}
