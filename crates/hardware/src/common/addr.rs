//! Data memory address type.
//!
//! Memory in this model is a flat map of word-sized cells. Addresses are signed
//! because they are produced by `offset * scale + base`, and nothing stops a
//! program from computing a negative effective address; the model simply treats
//! it as another key.

use std::fmt;

/// An effective address in data memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MemAddr(pub i64);

impl MemAddr {
    /// Computes `offset * scale + base`, wrapping on overflow.
    ///
    /// # Arguments
    ///
    /// * `offset` - Constant offset taken from the instruction text.
    /// * `scale` - Multiplier applied to the offset (see `GeneralConfig::offset_scale`).
    /// * `base` - Value of the base register.
    #[inline]
    pub fn effective(offset: i64, scale: i64, base: i64) -> Self {
        Self(offset.wrapping_mul(scale).wrapping_add(base))
    }

    /// Returns the raw address value.
    #[inline]
    pub fn val(self) -> i64 {
        self.0
    }
}

impl fmt::Display for MemAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
