//! Functional unit pools.
//!
//! Each class has a fixed number of identical units. A dispatched
//! instruction occupies one unit from its start cycle until
//! `start + latency`, when the unit is reclaimed at the top of the cycle.

use crate::isa::UnitClass;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Occupant {
    index: usize,
    free_at: u64,
}

/// Busy-until bookkeeping for every unit of every class.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FunctionalUnitPool {
    units: [Vec<Option<Occupant>>; 5],
}

impl FunctionalUnitPool {
    /// Creates idle pools with the given unit counts, indexed like [`UnitClass::ALL`].
    pub fn new(counts: [usize; 5]) -> Self {
        Self {
            units: counts.map(|n| vec![None; n]),
        }
    }

    /// Returns true if some unit of `class` is idle.
    pub fn has_free(&self, class: UnitClass) -> bool {
        self.units[class.index()].iter().any(Option::is_none)
    }

    /// Occupies an idle unit until `free_at`. Returns the unit number, or
    /// `None` when every unit of the class is busy.
    pub fn acquire(&mut self, class: UnitClass, index: usize, free_at: u64) -> Option<usize> {
        let slot = self.units[class.index()]
            .iter()
            .position(Option::is_none)?;
        self.units[class.index()][slot] = Some(Occupant { index, free_at });
        Some(slot)
    }

    /// Index of the instruction that frees a unit of `class` soonest.
    pub fn holder(&self, class: UnitClass) -> Option<usize> {
        self.units[class.index()]
            .iter()
            .flatten()
            .min_by_key(|o| (o.free_at, o.index))
            .map(|o| o.index)
    }

    /// Frees every unit whose occupancy has ended by `cycle`.
    pub fn reclaim(&mut self, cycle: u64) {
        for unit in self.units.iter_mut().flatten() {
            if unit.is_some_and(|o| o.free_at <= cycle) {
                *unit = None;
            }
        }
    }
}
