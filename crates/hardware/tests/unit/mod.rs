//! # Engine Tests
//!
//! Organizes the integration suite by the surface under test.

/// Scheduling behavior: timing, hazards, capacity, memory ordering, properties.
pub mod core;

/// Program files, configuration files and the report.
pub mod sim;

/// Statistics counters gathered during a run.
pub mod stats;
