//! Simulator error definitions.
//!
//! This module defines every failure the simulator can report. It provides:
//! 1. **Input errors:** Unknown opcodes, malformed registers and operands in a program file.
//! 2. **Capacity exhaustion:** A recoverable condition the issue stage turns into a stall.
//! 3. **Safety trips:** Non-convergence of the cycle loop.
//! 4. **Internal defects:** Stale producer tags and broken invariants.

use std::path::PathBuf;

use thiserror::Error;

use crate::core::pipeline::rob::RobTag;

/// Bounded structures that can refuse a new entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Structure {
    /// The reorder buffer.
    ReorderBuffer,
    /// A reservation-station pool (named by its functional-unit class).
    ReservationStation(&'static str),
    /// The load-store queue.
    LoadStoreQueue,
}

impl std::fmt::Display for Structure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReorderBuffer => write!(f, "reorder buffer"),
            Self::ReservationStation(pool) => write!(f, "{pool} reservation stations"),
            Self::LoadStoreQueue => write!(f, "load-store queue"),
        }
    }
}

/// Errors raised while loading, configuring, or running a simulation.
#[derive(Debug, Error)]
pub enum SimError {
    /// The program contains an operation the engine cannot schedule.
    #[error("line {line}: unknown opcode `{mnemonic}`")]
    UnknownOpcode {
        /// 1-based line number in the program text.
        line: usize,
        /// The offending mnemonic as written.
        mnemonic: String,
    },

    /// A register name is not one of `R0`-`R31` or `F0`-`F31`.
    #[error("malformed register name `{0}`")]
    MalformedRegister(String),

    /// An operand could not be decoded (bad immediate, bad `off(base)` form).
    #[error("line {line}: malformed operand `{operand}`")]
    MalformedOperand {
        /// 1-based line number in the program text.
        line: usize,
        /// The operand text.
        operand: String,
    },

    /// Any other program-text problem (wrong operand count, bad directive).
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number in the program text.
        line: usize,
        /// Human-readable description.
        message: String,
    },

    /// A bounded structure is full. Recoverable: the issue stage stalls.
    #[error("{0} is full")]
    CapacityExceeded(Structure),

    /// The cycle bound was exceeded before the reorder buffer drained.
    #[error("scheduling did not converge within {cycles} cycles")]
    NonConvergence {
        /// The bound that was exceeded.
        cycles: u64,
    },

    /// A producer tag that names no live entry. Always a defect.
    #[error("internal error: no live entry for {0}")]
    UnknownTag(RobTag),

    /// Any other broken engine invariant. Always a defect.
    #[error("internal error: {0}")]
    Invariant(String),

    /// The configuration is unusable.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A JSON configuration document could not be parsed.
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl SimError {
    /// Returns true for conditions that only delay progress.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::CapacityExceeded(_))
    }

    /// Returns true for conditions that indicate a bug in the engine itself.
    pub fn is_defect(&self) -> bool {
        matches!(self, Self::UnknownTag(_) | Self::Invariant(_))
    }
}
