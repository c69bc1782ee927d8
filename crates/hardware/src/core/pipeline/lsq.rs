//! Load-Store Queue (LSQ) for memory ordering.
//!
//! Every load and store occupies one LSQ slot from issue until it retires,
//! in program order. The queue provides:
//! 1. **Allocation:** Reserve a slot when a memory instruction issues.
//! 2. **Resolution:** Record the effective address once address generation finishes.
//! 3. **Forwarding:** Supply a load from the nearest earlier store to the same address.
//! 4. **Disambiguation:** Hold a load back while an earlier store's address is unknown.
//! 5. **Retirement:** Remove entries from the head only, in commit order.

use std::collections::VecDeque;

use crate::common::{MemAddr, SimError, Structure, Value};
use crate::core::pipeline::reservation::Operand;
use crate::core::pipeline::rob::RobTag;

/// Result of a store-to-load forwarding check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ForwardResult {
    /// The nearest earlier same-address store has its value: use it.
    Hit(Value),
    /// No earlier store can alias the load: safe to read memory.
    Miss,
    /// An earlier store has an unknown address, or matches but has no value yet.
    Stall {
        /// Tag of the store holding the load back.
        blocker: RobTag,
    },
}

/// Kind of memory operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MemKind {
    /// `LD`.
    Load,
    /// `SD`.
    Store,
}

/// A single entry in the load-store queue.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LsqEntry {
    /// ROB tag of the memory instruction.
    pub tag: RobTag,
    /// Program-order index.
    pub index: usize,
    /// Load or store.
    pub kind: MemKind,
    /// Base register operand.
    pub base: Operand,
    /// Constant offset, scaled at address generation.
    pub offset: i64,
    /// Value to store (stores only).
    pub data: Option<Operand>,
    /// Effective address, once address generation has finished.
    pub address: Option<MemAddr>,
    /// Value obtained by a load, from memory or a forwarding store.
    pub value: Option<Value>,
    /// Whether the load's value was forwarded from a store.
    pub forwarded: bool,
}

/// Load-store queue, a FIFO of in-flight memory operations.
#[derive(Clone, Debug)]
pub struct LoadStoreQueue {
    entries: VecDeque<LsqEntry>,
    capacity: usize,
}

impl LoadStoreQueue {
    /// Creates a new queue with the given capacity.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Returns the capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of occupied entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the queue is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if the queue is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Appends a memory operation at the tail.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded(LoadStoreQueue)` when full.
    pub fn admit(
        &mut self,
        kind: MemKind,
        base: Operand,
        offset: i64,
        data: Option<Operand>,
        tag: RobTag,
        index: usize,
    ) -> Result<(), SimError> {
        if self.is_full() {
            return Err(SimError::CapacityExceeded(Structure::LoadStoreQueue));
        }
        self.entries.push_back(LsqEntry {
            tag,
            index,
            kind,
            base,
            offset,
            data,
            address: None,
            value: None,
            forwarded: false,
        });
        Ok(())
    }

    fn position(&self, tag: RobTag) -> Result<usize, SimError> {
        self.entries
            .iter()
            .position(|e| e.tag == tag)
            .ok_or(SimError::UnknownTag(tag))
    }

    fn entry_mut(&mut self, tag: RobTag) -> Result<&mut LsqEntry, SimError> {
        let pos = self.position(tag)?;
        self.entries
            .get_mut(pos)
            .ok_or(SimError::UnknownTag(tag))
    }

    /// Looks an entry up by tag.
    pub fn entry(&self, tag: RobTag) -> Option<&LsqEntry> {
        self.entries.iter().find(|e| e.tag == tag)
    }

    /// Returns the oldest entry.
    pub fn head(&self) -> Option<&LsqEntry> {
        self.entries.front()
    }

    /// Iterates over entries oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &LsqEntry> + '_ {
        self.entries.iter()
    }

    /// Reports whether the base register is resolved, so address generation may start.
    pub fn address_ready(&self, tag: RobTag) -> Result<bool, SimError> {
        self.entry(tag)
            .map(|e| e.base.is_ready())
            .ok_or(SimError::UnknownTag(tag))
    }

    /// Reports whether a store's data operand is resolved. Loads report true.
    pub fn store_value_ready(&self, tag: RobTag) -> Result<bool, SimError> {
        self.entry(tag)
            .map(|e| e.data.is_none_or(Operand::is_ready))
            .ok_or(SimError::UnknownTag(tag))
    }

    /// Records the effective address computed by address generation.
    pub fn resolve_address(&mut self, tag: RobTag, addr: MemAddr) -> Result<(), SimError> {
        self.entry_mut(tag)?.address = Some(addr);
        Ok(())
    }

    /// Records the value a load obtained.
    pub fn set_value(&mut self, tag: RobTag, value: Value, forwarded: bool) -> Result<(), SimError> {
        let entry = self.entry_mut(tag)?;
        entry.value = Some(value);
        entry.forwarded = forwarded;
        Ok(())
    }

    /// Resolves every base and data operand waiting on `tag`.
    pub fn broadcast_update(&mut self, tag: RobTag, value: Value) -> usize {
        let mut resolved = 0;
        for entry in &mut self.entries {
            resolved += usize::from(entry.base.resolve(tag, value));
            if let Some(data) = entry.data.as_mut() {
                resolved += usize::from(data.resolve(tag, value));
            }
        }
        resolved
    }

    /// Attempts store-to-load forwarding for the load `tag`.
    ///
    /// Scans earlier entries nearest-first. An earlier store with an unknown
    /// address stalls the load, since it might alias. The first store at the
    /// load's address forwards its value if resolved and stalls the load
    /// otherwise. If no earlier store can alias, returns `Miss`.
    ///
    /// # Errors
    ///
    /// `UnknownTag` if `tag` is not queued, `Invariant` if it is not a load
    /// or its address is not yet resolved.
    pub fn try_forward(&self, tag: RobTag) -> Result<ForwardResult, SimError> {
        let pos = self.position(tag)?;
        let load = &self.entries[pos];
        if load.kind != MemKind::Load {
            return Err(SimError::Invariant(format!("{tag} is not a load")));
        }
        let addr = load
            .address
            .ok_or_else(|| SimError::Invariant(format!("{tag} has no address yet")))?;

        for earlier in self.entries.range(..pos).rev() {
            if earlier.kind != MemKind::Store {
                continue;
            }
            match earlier.address {
                None => {
                    return Ok(ForwardResult::Stall {
                        blocker: earlier.tag,
                    });
                }
                Some(a) if a == addr => {
                    return Ok(match earlier.data.and_then(Operand::value) {
                        Some(v) => ForwardResult::Hit(v),
                        None => ForwardResult::Stall {
                            blocker: earlier.tag,
                        },
                    });
                }
                Some(_) => {}
            }
        }
        Ok(ForwardResult::Miss)
    }

    /// Removes the head entry if it is `tag`. Returns whether it did.
    pub fn dequeue(&mut self, tag: RobTag) -> bool {
        if self.entries.front().is_some_and(|e| e.tag == tag) {
            let _ = self.entries.pop_front();
            true
        } else {
            false
        }
    }
}
