//! Timing table.
//!
//! One row per issued instruction, recording the cycles it spent in each
//! stage and the hazards that delayed it. The engine only writes rows; the
//! report and the tests read them.

use std::collections::BTreeSet;
use std::fmt;

use crate::common::{ArchReg, SimError, Structure};
use crate::isa::UnitClass;

/// A shared resource an instruction can wait for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Resource {
    /// A functional unit of the given class.
    Unit(UnitClass),
    /// The common data bus.
    Cdb,
    /// The single memory port.
    MemoryPort,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unit(class) => write!(f, "{class}"),
            Self::Cdb => f.write_str("CDB"),
            Self::MemoryPort => f.write_str("memory port"),
        }
    }
}

/// Why an instruction was delayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Hazard {
    /// Issue waited for a free slot in a bounded structure.
    IssueStall(Structure),
    /// An operand is produced by an earlier in-flight instruction.
    Raw {
        /// The source register.
        reg: ArchReg,
        /// Index of the producing instruction.
        producer: usize,
    },
    /// A shared resource was held by another instruction.
    Structural {
        /// The resource.
        resource: Resource,
        /// Index of the holder, when one is known.
        holder: Option<usize>,
    },
    /// A load waited on an earlier store whose address or value was unknown.
    MemoryOrder {
        /// Index of the store.
        store: usize,
    },
}

impl fmt::Display for Hazard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IssueStall(structure) => write!(f, "issue stalled: {structure} full"),
            Self::Raw { reg, producer } => write!(f, "RAW on {reg} (from {producer})"),
            Self::Structural {
                resource,
                holder: Some(h),
            } => write!(f, "structural on {resource} (from {h})"),
            Self::Structural {
                resource,
                holder: None,
            } => write!(f, "structural on {resource}"),
            Self::MemoryOrder { store } => write!(f, "memory order (from {store})"),
        }
    }
}

/// Cycles spent in one stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StageSpan {
    /// First cycle in the stage.
    pub begin: u64,
    /// Number of cycles in the stage (at least one).
    pub duration: u64,
}

impl StageSpan {
    /// Creates a span; a zero duration is rounded up to one cycle.
    pub const fn new(begin: u64, duration: u64) -> Self {
        Self {
            begin,
            duration: if duration == 0 { 1 } else { duration },
        }
    }

    /// Last cycle in the stage.
    #[inline]
    pub const fn end(&self) -> u64 {
        self.begin + self.duration - 1
    }
}

impl fmt::Display for StageSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.duration == 1 {
            write!(f, "{}", self.begin)
        } else {
            write!(f, "{}-{}", self.begin, self.end())
        }
    }
}

/// One row of the timing table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TimingEntry {
    /// Program-order index.
    pub index: usize,
    /// Instruction text.
    pub text: String,
    /// Issue cycle.
    pub issue: u64,
    /// Execution (or address generation) span.
    pub execute: Option<StageSpan>,
    /// Memory span (loads only).
    pub memory: Option<StageSpan>,
    /// Cycle the result went onto the common data bus.
    pub write_back: Option<u64>,
    /// Commit span; longer than one cycle for stores writing memory.
    pub commit: Option<StageSpan>,
    /// Hazards that delayed the instruction.
    pub hazards: BTreeSet<Hazard>,
}

/// The timing table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TimingTable {
    entries: Vec<TimingEntry>,
}

impl TimingTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the row for a newly issued instruction.
    ///
    /// # Errors
    ///
    /// `Invariant` if `index` is not the next row.
    pub fn push(&mut self, index: usize, text: String, issue: u64) -> Result<(), SimError> {
        if index != self.entries.len() {
            return Err(SimError::Invariant(format!(
                "timing row {index} issued out of order (expected {})",
                self.entries.len()
            )));
        }
        self.entries.push(TimingEntry {
            index,
            text,
            issue,
            execute: None,
            memory: None,
            write_back: None,
            commit: None,
            hazards: BTreeSet::new(),
        });
        Ok(())
    }

    /// Returns the row for `index`.
    pub fn get(&self, index: usize) -> Option<&TimingEntry> {
        self.entries.get(index)
    }

    fn row(&mut self, index: usize) -> Result<&mut TimingEntry, SimError> {
        self.entries
            .get_mut(index)
            .ok_or_else(|| SimError::Invariant(format!("no timing row {index}")))
    }

    /// Records the execution span.
    pub fn set_execute(&mut self, index: usize, span: StageSpan) -> Result<(), SimError> {
        self.row(index)?.execute = Some(span);
        Ok(())
    }

    /// Records the memory span.
    pub fn set_memory(&mut self, index: usize, span: StageSpan) -> Result<(), SimError> {
        self.row(index)?.memory = Some(span);
        Ok(())
    }

    /// Records the writeback cycle.
    pub fn set_write_back(&mut self, index: usize, cycle: u64) -> Result<(), SimError> {
        self.row(index)?.write_back = Some(cycle);
        Ok(())
    }

    /// Records the commit span.
    pub fn set_commit(&mut self, index: usize, span: StageSpan) -> Result<(), SimError> {
        self.row(index)?.commit = Some(span);
        Ok(())
    }

    /// Adds a hazard annotation. Repeats of the same hazard are kept once.
    /// Returns true if the annotation is new.
    pub fn note(&mut self, index: usize, hazard: Hazard) -> Result<bool, SimError> {
        Ok(self.row(index)?.hazards.insert(hazard))
    }

    /// Iterates over rows in program order.
    pub fn iter(&self) -> impl Iterator<Item = &TimingEntry> + '_ {
        self.entries.iter()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has issued.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
