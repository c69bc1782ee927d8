//! Floating-Point Unit (FPU).
//!
//! Double-precision add, subtract, multiply and divide, served by the
//! `FP Add FU`, `FP Mul FU` and `FP Div FU` classes. Results follow IEEE 754
//! as implemented by `f64`: division by zero yields an infinity or NaN
//! rather than a trap.

use crate::isa::Opcode;

/// Floating-Point Unit (FPU) for double-precision operations.
#[derive(Debug)]
pub struct Fpu;

impl Fpu {
    /// Executes a floating-point operation.
    ///
    /// Returns `None` for an opcode the FPU does not serve.
    #[inline]
    pub fn execute(op: Opcode, a: f64, b: f64) -> Option<f64> {
        match op {
            Opcode::AddD => Some(a + b),
            Opcode::SubD => Some(a - b),
            Opcode::MulD => Some(a * b),
            Opcode::DivD => Some(a / b),
            _ => None,
        }
    }
}
