//! Execution units.
//!
//! This module contains the functional units the engine dispatches to:
//! the integer ALU, the floating-point unit, the memory port, and the
//! per-class busy-until pools that model unit counts and latencies.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Floating-Point Unit for double-precision operations.
pub mod fpu;

/// Load/Store Unit memory port.
pub mod lsu;

/// Functional unit occupancy per class.
pub mod pool;

use crate::common::{SimError, Value};
use crate::isa::{Opcode, UnitClass};

use self::alu::Alu;
use self::fpu::Fpu;

/// Computes the result of an arithmetic operation.
///
/// Integer operations read both operands as `i64`, floating-point operations
/// as `f64`.
///
/// # Errors
///
/// `Invariant` if `op` is a memory operation.
pub fn compute(op: Opcode, lhs: Value, rhs: Value) -> Result<Value, SimError> {
    let result = match op.unit_class() {
        UnitClass::IntAdder => Alu::execute(op, lhs.as_i64(), rhs.as_i64()).map(Value::Int),
        UnitClass::FpAdder | UnitClass::FpMultiplier | UnitClass::FpDivider => {
            Fpu::execute(op, lhs.as_f64(), rhs.as_f64()).map(Value::Float)
        }
        UnitClass::LoadStore => None,
    };
    result.ok_or_else(|| SimError::Invariant(format!("{op} has no arithmetic result")))
}
