//! Pipeline stage implementations.
//!
//! This module contains the stage functions the cycle driver calls. It includes:
//! 1. **Issue:** Renames one instruction and places it in the ROB and an RS pool or the LSQ.
//! 2. **Execute:** Dispatches ready entries to functional units and retires finished execution.
//! 3. **Memory:** Lets loads take a forwarded value or read memory.
//! 4. **Writeback:** Arbitrates for the common data bus.
//! 5. **Commit:** Retires the ROB head into the register file or memory.

/// Commit stage implementation.
pub mod commit;

/// Execute stage implementation (dispatch and completion).
pub mod execute;

/// Issue stage implementation.
pub mod issue;

/// Memory access stage implementation.
pub mod memory;

/// Writeback (CDB arbitration) implementation.
pub mod writeback;

/// Commit stage entry point (CM).
pub use commit::commit_stage;
/// Execute stage entry points (ISSUE->EX and leaving EX).
pub use execute::{complete_stage, execute_stage};
/// Issue stage entry point (IS).
pub use issue::issue_stage;
/// Memory stage entry point (MEM->WB).
pub use memory::mem_stage;
/// Writeback entry point (CDB broadcast).
pub use writeback::wb_stage;
