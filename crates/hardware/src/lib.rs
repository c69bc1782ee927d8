//! Tomasulo dynamic scheduling simulator library.
//!
//! This crate simulates, cycle by cycle, how a small floating-point and
//! integer instruction set flows through a Tomasulo machine with a reorder
//! buffer. It provides the following:
//! 1. **ISA:** Opcodes, their functional-unit classes, and the textual decoder.
//! 2. **Core:** Register alias table, reservation stations, reorder buffer,
//!    load-store queue, common data bus, functional units and the stage functions.
//! 3. **Timing:** Per-instruction issue/execute/memory/writeback/commit cycles
//!    annotated with the hazards that delayed them.
//! 4. **Simulation:** Program loading, configuration, statistics and reporting.
//!
//! ```
//! use tomasim_core::{Config, Simulator};
//! use tomasim_core::sim::parse_program;
//!
//! let program = parse_program("ADDI R1, R0, 5\nADD R2, R1, R1\n").unwrap();
//! let mut sim = Simulator::new(Config::default(), program).unwrap();
//! let cycles = sim.run().unwrap();
//! assert_eq!(cycles, 6);
//! ```

/// Common types (addresses, registers, values, errors).
pub mod common;
/// Simulator configuration (structure sizes, unit counts and latencies).
pub mod config;
/// Scheduling core (architected state, pipeline structures, stages, units).
pub mod core;
/// Instruction set (opcodes, instruction records, decoding).
pub mod isa;
/// Program loading, the simulator wrapper and the run report.
pub mod sim;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Crate-wide error type.
pub use crate::common::SimError;
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Cycle driver, generic over register file and memory.
pub use crate::core::{Engine, Status};
/// Engine plus the default register file and memory.
pub use crate::sim::Simulator;
/// Counters gathered during a run.
pub use crate::stats::SimStats;
