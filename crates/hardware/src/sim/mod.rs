//! Simulation front end.
//!
//! Loads textual programs, wraps the engine with the default register file
//! and memory, and renders the end-of-run report.

/// Program text loading and initial-state seeding.
pub mod loader;

/// Timing table, register and memory report.
pub mod report;

/// Engine plus committed state, driven one cycle at a time.
pub mod simulator;

pub use loader::{Program, load_program, parse_program};
pub use simulator::Simulator;
