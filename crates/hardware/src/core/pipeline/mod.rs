//! Dynamic scheduling pipeline.
//!
//! This module contains the structures Tomasulo's algorithm coordinates and the
//! stages that drive instructions through them. It includes the following components:
//! 1. **RAT:** Register renaming to in-flight producer tags.
//! 2. **Reservation Stations:** Per-class pools of instructions waiting for operands.
//! 3. **LSQ:** Program-ordered memory operations with store-to-load forwarding.
//! 4. **ROB:** Program-ordered in-flight instructions and in-order commit.
//! 5. **CDB:** The single result broadcast per cycle.
//! 6. **Timing:** Per-instruction stage cycles and hazard annotations.
//! 7. **Stages and Engine:** The per-cycle protocol that ties them together.

/// Common data bus.
pub mod cdb;

/// Cycle driver.
pub mod engine;

/// Load-store queue.
pub mod lsq;

/// Register alias table.
pub mod rat;

/// Reservation-station pools and operand slots.
pub mod reservation;

/// Reorder buffer.
pub mod rob;

/// Pipeline stage implementations (issue, execute, memory, writeback, commit).
pub mod stages;

/// Timing table and hazard annotations.
pub mod timing;
