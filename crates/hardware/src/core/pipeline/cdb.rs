//! Common Data Bus (CDB).
//!
//! A single broadcast channel: at most one result is placed on it per
//! cycle. A result posted during cycle `c` is delivered to waiting
//! reservation stations, the load-store queue and the ROB at the start of
//! cycle `c + 1`, which also frees the bus.

use crate::common::{SimError, Value};
use crate::core::pipeline::rob::RobTag;

/// One result published on the bus.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Broadcast {
    /// Cycle in which the result was placed on the bus.
    pub cycle: u64,
    /// Producer tag.
    pub tag: RobTag,
    /// Program-order index of the producer.
    pub index: usize,
    /// Published value.
    pub value: Value,
}

/// The common data bus.
#[derive(Clone, Debug, Default)]
pub struct CommonDataBus {
    pending: Option<Broadcast>,
    history: Vec<Broadcast>,
}

impl CommonDataBus {
    /// Creates an idle bus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if nothing has been placed on the bus this cycle.
    #[inline]
    pub fn is_free(&self) -> bool {
        self.pending.is_none()
    }

    /// Index of the instruction holding the bus this cycle.
    pub fn holder(&self) -> Option<usize> {
        self.pending.map(|b| b.index)
    }

    /// Places a result on the bus.
    ///
    /// # Errors
    ///
    /// `Invariant` if the bus already carries a result this cycle.
    pub fn broadcast(&mut self, broadcast: Broadcast) -> Result<(), SimError> {
        if let Some(current) = self.pending {
            return Err(SimError::Invariant(format!(
                "{} and {} both broadcast in cycle {}",
                current.tag, broadcast.tag, broadcast.cycle
            )));
        }
        self.pending = Some(broadcast);
        self.history.push(broadcast);
        Ok(())
    }

    /// Takes the result posted last cycle for delivery, freeing the bus.
    pub fn take_pending(&mut self) -> Option<Broadcast> {
        self.pending.take()
    }

    /// Every result ever placed on the bus, in cycle order.
    pub fn history(&self) -> &[Broadcast] {
        &self.history
    }
}
