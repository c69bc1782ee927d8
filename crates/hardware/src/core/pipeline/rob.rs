//! Reorder Buffer (ROB) for in-order commit.
//!
//! The ROB is a circular buffer that tracks every in-flight instruction from
//! issue through commit. It provides:
//! 1. **Allocation:** Assigns a unique tag to each instruction entering the engine.
//! 2. **Progress:** Records each entry's stage and, once broadcast, its result value.
//! 3. **In-order Commit:** Retires instructions from the head in program order.
//! 4. **Lookup:** Resolves a producer tag to its value for operand reads at issue.

use std::fmt;

use crate::common::{ArchReg, MemAddr, SimError, Structure, Value};
use crate::isa::{Instruction, Opcode};

/// Unique tag identifying an in-flight instruction in the ROB.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RobTag(pub u32);

impl fmt::Display for RobTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ROB{}", self.0)
    }
}

/// Lifecycle state of an ROB entry.
///
/// States only ever move forward: `Issue -> Execute -> (Memory) -> WriteBack -> Committed`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum RobState {
    /// Waiting in a reservation station or the load-store queue.
    #[default]
    Issue,
    /// Occupying a functional unit.
    Execute,
    /// Loads only: reading memory or taking a forwarded value.
    Memory,
    /// Result placed on the common data bus.
    WriteBack,
    /// Retired from the head.
    Committed,
}

impl fmt::Display for RobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Issue => "IS",
            Self::Execute => "EX",
            Self::Memory => "MEM",
            Self::WriteBack => "WB",
            Self::Committed => "CM",
        };
        f.write_str(name)
    }
}

/// Where a committed value goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Destination {
    /// An architectural register.
    Register(ArchReg),
    /// A memory word; the address is unknown until the store's address generation.
    Memory(Option<MemAddr>),
}

/// A single entry in the Reorder Buffer.
#[derive(Clone, Debug)]
pub struct RobEntry {
    /// Unique tag for this entry.
    pub tag: RobTag,
    /// Program-order index, also the row in the timing table.
    pub index: usize,
    /// The instruction.
    pub inst: Instruction,
    /// Commit target.
    pub dest: Destination,
    /// Current lifecycle state.
    pub state: RobState,
    /// Result computed by a functional unit or memory, not yet broadcast.
    pub result: Option<Value>,
    /// Cycle at which the current stage's work is finished.
    pub ready_at: Option<u64>,
    /// Value delivered by the common data bus.
    pub value: Option<Value>,
}

/// Everything the commit stage needs from the head entry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CommitData {
    /// Row in the timing table.
    pub index: usize,
    /// Commit target.
    pub dest: Destination,
    /// Value to write.
    pub value: Value,
    /// Operation.
    pub opcode: Opcode,
    /// Tag of the retiring entry.
    pub tag: RobTag,
}

/// Reorder Buffer, a circular buffer for in-order commit.
#[derive(Debug)]
pub struct Rob {
    /// Fixed-size slot array; `None` marks a free slot.
    entries: Vec<Option<RobEntry>>,
    /// Index of the oldest entry (commit point).
    head: usize,
    /// Index where the next entry will be allocated.
    tail: usize,
    /// Number of occupied slots.
    count: usize,
    /// Monotonically increasing tag counter.
    next_tag: u32,
}

impl Rob {
    /// Creates a new ROB with the given capacity.
    pub fn new(capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(capacity);
        entries.resize_with(capacity, || None);
        Self {
            entries,
            head: 0,
            tail: 0,
            count: 0,
            next_tag: 1,
        }
    }

    /// Returns the ROB capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of occupied entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the ROB is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if the ROB is full.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.count == self.entries.len()
    }

    /// Allocates an entry at the tail.
    ///
    /// # Errors
    ///
    /// `CapacityExceeded(ReorderBuffer)` when every slot is occupied.
    pub fn admit(&mut self, inst: Instruction, index: usize) -> Result<RobTag, SimError> {
        if self.is_full() {
            return Err(SimError::CapacityExceeded(Structure::ReorderBuffer));
        }

        let tag = RobTag(self.next_tag);
        self.next_tag = self.next_tag.wrapping_add(1);
        if self.next_tag == 0 {
            self.next_tag = 1; // skip 0
        }

        let dest = match inst.dest {
            Some(reg) => Destination::Register(reg),
            None => Destination::Memory(None),
        };
        self.entries[self.tail] = Some(RobEntry {
            tag,
            index,
            inst,
            dest,
            state: RobState::Issue,
            result: None,
            ready_at: None,
            value: None,
        });

        self.tail = (self.tail + 1) % self.entries.len();
        self.count += 1;
        Ok(tag)
    }

    /// Advances an entry's state.
    ///
    /// # Errors
    ///
    /// `UnknownTag` for a tag with no live entry, `Invariant` for a backward transition.
    pub fn update_state(&mut self, tag: RobTag, state: RobState) -> Result<(), SimError> {
        let entry = self.find_entry_mut(tag).ok_or(SimError::UnknownTag(tag))?;
        if state < entry.state {
            return Err(SimError::Invariant(format!(
                "{tag} moved backward from {} to {state}",
                entry.state
            )));
        }
        entry.state = state;
        Ok(())
    }

    /// Records the value delivered by the common data bus.
    pub fn update_value(&mut self, tag: RobTag, value: Value) -> Result<(), SimError> {
        let entry = self.find_entry_mut(tag).ok_or(SimError::UnknownTag(tag))?;
        entry.value = Some(value);
        Ok(())
    }

    /// Records the outcome of a functional unit or memory access.
    ///
    /// `result` is the value that will be broadcast; `ready_at` is the first
    /// cycle in which the entry may leave its current stage.
    pub fn set_outcome(
        &mut self,
        tag: RobTag,
        result: Option<Value>,
        ready_at: u64,
    ) -> Result<(), SimError> {
        let entry = self.find_entry_mut(tag).ok_or(SimError::UnknownTag(tag))?;
        if result.is_some() {
            entry.result = result;
        }
        entry.ready_at = Some(ready_at);
        Ok(())
    }

    /// Records a store's resolved address as its commit target.
    pub fn set_address(&mut self, tag: RobTag, addr: MemAddr) -> Result<(), SimError> {
        let entry = self.find_entry_mut(tag).ok_or(SimError::UnknownTag(tag))?;
        match entry.dest {
            Destination::Memory(_) => {
                entry.dest = Destination::Memory(Some(addr));
                Ok(())
            }
            Destination::Register(_) => Err(SimError::Invariant(format!(
                "{tag} writes a register but was given address {addr}"
            ))),
        }
    }

    /// Returns the head entry (oldest), if the ROB is non-empty.
    pub fn peek_head(&self) -> Option<&RobEntry> {
        if self.count == 0 {
            None
        } else {
            self.entries[self.head].as_ref()
        }
    }

    /// Returns the head's commit data if it may retire this cycle.
    ///
    /// The head must have written back and received its value. A store also
    /// needs a known address and an idle memory port (`memory_free`).
    pub fn ready_to_commit(&self, memory_free: bool) -> Option<CommitData> {
        let head = self.peek_head()?;
        if head.state != RobState::WriteBack {
            return None;
        }
        let value = head.value?;
        if let Destination::Memory(addr) = head.dest
            && (addr.is_none() || !memory_free)
        {
            return None;
        }
        Some(CommitData {
            index: head.index,
            dest: head.dest,
            value,
            opcode: head.inst.opcode,
            tag: head.tag,
        })
    }

    /// Pops the head entry. Returns `None` if the ROB is empty.
    pub fn commit(&mut self) -> Option<RobEntry> {
        if self.count == 0 {
            return None;
        }

        let mut committed = self.entries[self.head].take()?;
        committed.state = RobState::Committed;
        self.head = (self.head + 1) % self.entries.len();
        self.count -= 1;
        Some(committed)
    }

    /// Iterates over live entries from head to tail (program order).
    pub fn iter(&self) -> impl Iterator<Item = &RobEntry> + '_ {
        let len = self.entries.len();
        (0..self.count).filter_map(move |i| self.entries[(self.head + i) % len].as_ref())
    }

    /// Tags of live entries in program order.
    pub fn tags(&self) -> Vec<RobTag> {
        self.iter().map(|e| e.tag).collect()
    }

    /// Finds a reference to the entry with the given tag.
    pub fn find_entry(&self, tag: RobTag) -> Option<&RobEntry> {
        self.iter().find(|e| e.tag == tag)
    }

    /// Finds a mutable reference to the entry with the given tag.
    fn find_entry_mut(&mut self, tag: RobTag) -> Option<&mut RobEntry> {
        if self.count == 0 {
            return None;
        }

        let len = self.entries.len();
        let mut idx = self.head;
        for _ in 0..self.count {
            if self.entries[idx].as_ref().is_some_and(|e| e.tag == tag) {
                return self.entries[idx].as_mut();
            }
            idx = (idx + 1) % len;
        }
        None
    }
}
