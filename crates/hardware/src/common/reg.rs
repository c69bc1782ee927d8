//! Architectural register names.
//!
//! The model has two banks of 32 registers: integer registers `R0`-`R31` and
//! floating-point registers `F0`-`F31`. Unlike RISC-V's `x0`, `R0` is an
//! ordinary register here.

use std::fmt;
use std::str::FromStr;

use super::error::SimError;

/// Number of registers in each bank.
pub const REGS_PER_BANK: usize = 32;

/// An architectural register.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArchReg {
    /// Integer register `R<n>`.
    Int(u8),
    /// Floating-point register `F<n>`.
    Fp(u8),
}

impl ArchReg {
    /// Returns the register number within its bank.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Int(n) | Self::Fp(n) => n as usize,
        }
    }

    /// Checks that the register number lies inside its bank.
    pub fn validate(self) -> Result<Self, SimError> {
        if self.index() < REGS_PER_BANK {
            Ok(self)
        } else {
            Err(SimError::MalformedRegister(self.to_string()))
        }
    }

    /// Returns true for the floating-point bank.
    #[inline]
    pub fn is_fp(self) -> bool {
        matches!(self, Self::Fp(_))
    }
}

impl FromStr for ArchReg {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || SimError::MalformedRegister(s.to_string());
        let mut chars = s.chars();
        let bank = chars.next().ok_or_else(malformed)?;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let n: usize = digits.parse().map_err(|_| malformed())?;
        if n >= REGS_PER_BANK {
            return Err(malformed());
        }
        match bank.to_ascii_uppercase() {
            'R' => Ok(Self::Int(n as u8)),
            'F' => Ok(Self::Fp(n as u8)),
            _ => Err(malformed()),
        }
    }
}

impl fmt::Display for ArchReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "R{n}"),
            Self::Fp(n) => write!(f, "F{n}"),
        }
    }
}
