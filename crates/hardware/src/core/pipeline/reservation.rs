//! Reservation stations.
//!
//! One bounded pool per arithmetic functional-unit class holds issued
//! instructions until both operands are resolved and a unit is free. Each
//! pool is keyed by ROB tag; tags grow with program order, so iterating a
//! pool visits the oldest entry first, which is the dispatch priority.

use std::collections::BTreeMap;
use std::fmt;

use crate::common::{SimError, Structure, Value};
use crate::core::pipeline::rob::RobTag;
use crate::isa::{Opcode, UnitClass};

/// An operand slot: either a resolved value or the tag of its future producer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand {
    /// The value is known.
    Ready(Value),
    /// The value will arrive on the common data bus under this tag.
    Pending(RobTag),
}

impl Operand {
    /// Returns the value if resolved.
    #[inline]
    pub fn value(self) -> Option<Value> {
        match self {
            Self::Ready(v) => Some(v),
            Self::Pending(_) => None,
        }
    }

    /// Returns true once the value is known.
    #[inline]
    pub fn is_ready(self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Resolves the slot if it waits on `tag`. Returns true when it did.
    pub fn resolve(&mut self, tag: RobTag, value: Value) -> bool {
        match *self {
            Self::Pending(t) if t == tag => {
                *self = Self::Ready(value);
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready(v) => write!(f, "{v}"),
            Self::Pending(t) => write!(f, "{t}"),
        }
    }
}

/// A reservation-station entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RsEntry {
    /// Operation to perform.
    pub opcode: Opcode,
    /// Destination tag (the instruction's own ROB tag).
    pub tag: RobTag,
    /// Program-order index.
    pub index: usize,
    /// First operand.
    pub lhs: Operand,
    /// Second operand (the immediate for `ADDI`).
    pub rhs: Operand,
}

impl RsEntry {
    /// Returns both operand values once they are resolved.
    pub fn operands(&self) -> Option<(Value, Value)> {
        Some((self.lhs.value()?, self.rhs.value()?))
    }
}

/// The reservation-station pools, one per arithmetic unit class.
#[derive(Clone, Debug)]
pub struct ReservationStations {
    pools: [BTreeMap<RobTag, RsEntry>; 4],
    capacity: [usize; 4],
}

impl ReservationStations {
    /// Creates empty pools with the given per-class capacities, indexed like
    /// [`UnitClass::ARITHMETIC`].
    pub fn new(capacity: [usize; 4]) -> Self {
        Self {
            pools: Default::default(),
            capacity,
        }
    }

    fn slot(class: UnitClass) -> Result<usize, SimError> {
        if class == UnitClass::LoadStore {
            return Err(SimError::Invariant(
                "memory operations have no reservation stations".into(),
            ));
        }
        Ok(class.index())
    }

    /// Returns true if the class's pool can take another entry.
    pub fn has_space(&self, class: UnitClass) -> bool {
        Self::slot(class).is_ok_and(|i| self.pools[i].len() < self.capacity[i])
    }

    /// Total occupied entries across pools.
    pub fn len(&self) -> usize {
        self.pools.iter().map(BTreeMap::len).sum()
    }

    /// Returns true if every pool is empty.
    pub fn is_empty(&self) -> bool {
        self.pools.iter().all(BTreeMap::is_empty)
    }

    /// Places an entry in the pool of its opcode's class.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded` when the pool is full.
    pub fn admit(&mut self, entry: RsEntry) -> Result<(), SimError> {
        let class = entry.opcode.unit_class();
        let slot = Self::slot(class)?;
        if self.pools[slot].len() >= self.capacity[slot] {
            return Err(SimError::CapacityExceeded(Structure::ReservationStation(
                class.name(),
            )));
        }
        let _ = self.pools[slot].insert(entry.tag, entry);
        Ok(())
    }

    /// Looks an entry up by tag.
    pub fn entry(&self, tag: RobTag) -> Option<&RsEntry> {
        self.pools.iter().find_map(|p| p.get(&tag))
    }

    /// Reports whether both operands of the entry are resolved.
    pub fn operands_ready(&self, tag: RobTag) -> Result<bool, SimError> {
        self.entry(tag)
            .map(|e| e.lhs.is_ready() && e.rhs.is_ready())
            .ok_or(SimError::UnknownTag(tag))
    }

    /// Resolves every operand in every pool that waits on `tag`.
    /// Returns how many slots were resolved.
    pub fn broadcast_update(&mut self, tag: RobTag, value: Value) -> usize {
        let mut resolved = 0;
        for entry in self.pools.iter_mut().flat_map(BTreeMap::values_mut) {
            resolved += usize::from(entry.lhs.resolve(tag, value));
            resolved += usize::from(entry.rhs.resolve(tag, value));
        }
        resolved
    }

    /// Removes a dispatched entry.
    pub fn release(&mut self, tag: RobTag) -> Result<RsEntry, SimError> {
        self.pools
            .iter_mut()
            .find_map(|p| p.remove(&tag))
            .ok_or(SimError::UnknownTag(tag))
    }
}
