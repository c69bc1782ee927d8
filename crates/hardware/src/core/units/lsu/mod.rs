//! Load/Store Unit (LSU) memory port.
//!
//! Memory has one port. A load reading memory or a committing store writing
//! it holds the port for the configured memory latency; nothing else may
//! access memory until it is released. A store's write lands in memory when
//! its hold expires, at the start of the cycle it is released.

use crate::common::{MemAddr, Value};
use crate::core::pipeline::rob::RobTag;

/// A store write in progress.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PendingWrite {
    /// Target address.
    pub addr: MemAddr,
    /// Value to write.
    pub value: Value,
    /// Tag of the store, for its load-store queue release.
    pub tag: RobTag,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Hold {
    index: usize,
    free_at: u64,
    write: Option<PendingWrite>,
}

/// The single memory port.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MemoryPort {
    hold: Option<Hold>,
}

impl MemoryPort {
    /// Creates an idle port.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if no access is in progress.
    #[inline]
    pub fn is_free(&self) -> bool {
        self.hold.is_none()
    }

    /// Index of the instruction holding the port.
    pub fn holder(&self) -> Option<usize> {
        self.hold.map(|h| h.index)
    }

    /// Starts a load's read. Returns false if the port is busy.
    pub fn begin_read(&mut self, index: usize, free_at: u64) -> bool {
        if self.hold.is_some() {
            return false;
        }
        self.hold = Some(Hold {
            index,
            free_at,
            write: None,
        });
        true
    }

    /// Starts a committed store's write. Returns false if the port is busy.
    pub fn begin_write(&mut self, index: usize, free_at: u64, write: PendingWrite) -> bool {
        if self.hold.is_some() {
            return false;
        }
        self.hold = Some(Hold {
            index,
            free_at,
            write: Some(write),
        });
        true
    }

    /// Releases the port if its hold has expired by `cycle`.
    ///
    /// Returns the write to apply when the finished access was a store.
    pub fn reclaim(&mut self, cycle: u64) -> Option<PendingWrite> {
        let hold = self.hold?;
        if hold.free_at > cycle {
            return None;
        }
        self.hold = None;
        hold.write
    }
}
