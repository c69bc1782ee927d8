//! Scheduling core.
//!
//! This module contains the dynamic scheduling engine: the architected state
//! it reads and commits to, the pipeline structures and stages that implement
//! Tomasulo's algorithm, and the functional units instructions execute on.

/// Architected state (register file, memory) and the traits the engine uses to reach it.
pub mod arch;

/// Scheduling structures, pipeline stages and the cycle driver.
pub mod pipeline;

/// Execution units (ALU, FPU, memory port, unit pools).
pub mod units;

pub use self::pipeline::engine::{Engine, Status};
