//! Data values.
//!
//! Registers, memory cells and bus broadcasts all carry a [`Value`]. Integer
//! operations read their operands as `i64` and floating-point operations as
//! `f64`, so a value loaded from memory into either bank is usable by both
//! operation families.

use std::fmt;
use std::str::FromStr;

/// A data value held in a register, a memory cell, or an operand slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Value {
    /// A 64-bit signed integer.
    Int(i64),
    /// A double-precision float.
    Float(f64),
}

impl Default for Value {
    fn default() -> Self {
        Self::Int(0)
    }
}

impl Value {
    /// Returns the value as an integer, truncating floats toward zero.
    #[inline]
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Int(v) => v,
            Self::Float(v) => v as i64,
        }
    }

    /// Returns the value as a float.
    #[inline]
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Int(v) => v as f64,
            Self::Float(v) => v,
        }
    }

    /// Returns true for integer zero and floating-point zero.
    pub fn is_zero(self) -> bool {
        match self {
            Self::Int(v) => v == 0,
            Self::Float(v) => v == 0.0,
        }
    }
}

impl FromStr for Value {
    type Err = std::num::ParseFloatError;

    /// Parses an integer literal, or a float literal when the text has a
    /// decimal point, an exponent, or is otherwise not a plain integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(v) = s.parse::<i64>() {
            return Ok(Self::Int(v));
        }
        s.parse::<f64>().map(Self::Float)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{v}"),
            Self::Float(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.1}"),
            Self::Float(v) => write!(f, "{v}"),
        }
    }
}
