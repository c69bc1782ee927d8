//! Writeback (WB) Stage.
//!
//! Arbitration for the common data bus. The cycle driver visits ROB entries
//! in program order, so the oldest finished instruction reaches the bus first
//! and every later one records a structural hazard naming the winner and
//! tries again next cycle.

use tracing::debug;

use crate::common::{SimError, Value};
use crate::core::arch::{MemoryStore, RegisterStore};
use crate::core::pipeline::cdb::Broadcast;
use crate::core::pipeline::engine::Engine;
use crate::core::pipeline::rob::{RobState, RobTag};
use crate::core::pipeline::timing::{Hazard, Resource};

/// Places `value` on the bus for `tag` if the bus is free this cycle.
///
/// Returns true if the instruction wrote back.
pub fn wb_stage<R: RegisterStore, M: MemoryStore>(
    engine: &mut Engine<R, M>,
    tag: RobTag,
    index: usize,
    value: Value,
) -> Result<bool, SimError> {
    let cycle = engine.cycle;
    if !engine.cdb.is_free() {
        let _ = engine.timing.note(
            index,
            Hazard::Structural {
                resource: Resource::Cdb,
                holder: engine.cdb.holder(),
            },
        )?;
        engine.stats.waits_cdb += 1;
        return Ok(false);
    }

    engine.cdb.broadcast(Broadcast {
        cycle,
        tag,
        index,
        value,
    })?;
    engine.rob.update_state(tag, RobState::WriteBack)?;
    engine.timing.set_write_back(index, cycle)?;
    engine.stats.cdb_broadcasts += 1;
    debug!(cycle, index, %tag, %value, "broadcast");
    Ok(true)
}
