//! Commit (CM) Stage.
//!
//! Retires at most one instruction per cycle from the ROB head, strictly in
//! program order. It performs the following:
//! 1. **Register Commit:** Writes the value to the register file and clears the
//!    RAT binding if it still names the retiring tag.
//! 2. **Store Commit:** Starts the memory write, which holds the memory port for
//!    the memory latency and lands when the hold expires.
//! 3. **Bookkeeping:** Appends to the commit log and updates the instruction mix.

use tracing::debug;

use crate::common::SimError;
use crate::core::arch::{MemoryStore, RegisterStore};
use crate::core::pipeline::engine::Engine;
use crate::core::pipeline::rob::{Destination, RobState};
use crate::core::pipeline::timing::{Hazard, Resource, StageSpan};
use crate::core::units::lsu::PendingWrite;

/// Executes the commit stage.
///
/// Returns the program index of the retired instruction, if any.
pub fn commit_stage<R: RegisterStore, M: MemoryStore>(
    engine: &mut Engine<R, M>,
) -> Result<Option<usize>, SimError> {
    let cycle = engine.cycle;
    let Some(data) = engine.rob.ready_to_commit(engine.port.is_free()) else {
        note_blocked_store(engine)?;
        return Ok(None);
    };

    match data.dest {
        Destination::Register(reg) => {
            engine.regs.write(reg, data.value);
            engine.rat.clear_if_current(reg, data.tag);
            engine.timing.set_commit(data.index, StageSpan::new(cycle, 1))?;
        }
        Destination::Memory(Some(addr)) => {
            let latency = engine.config.units.load_store.mem_latency;
            let write = PendingWrite {
                addr,
                value: data.value,
                tag: data.tag,
            };
            if !engine.port.begin_write(data.index, cycle + latency, write) {
                return Err(SimError::Invariant(format!(
                    "{} committed while the memory port was busy",
                    data.tag
                )));
            }
            engine.timing.set_commit(data.index, StageSpan::new(cycle, latency))?;
        }
        Destination::Memory(None) => {
            return Err(SimError::Invariant(format!(
                "{} committed without an address",
                data.tag
            )));
        }
    }

    let _ = engine.rob.commit();
    engine.commit_log.push(data.index);
    engine.stats.record_commit(data.opcode);
    debug!(cycle, index = data.index, tag = %data.tag, value = %data.value, "committed");
    Ok(Some(data.index))
}

/// Records the memory-port wait of a finished store at the head.
fn note_blocked_store<R, M>(engine: &mut Engine<R, M>) -> Result<(), SimError> {
    let Some(head) = engine.rob.peek_head() else {
        return Ok(());
    };
    let finished_store = head.state == RobState::WriteBack
        && head.value.is_some()
        && matches!(head.dest, Destination::Memory(Some(_)));
    if finished_store && !engine.port.is_free() {
        let index = head.index;
        let _ = engine.timing.note(
            index,
            Hazard::Structural {
                resource: Resource::MemoryPort,
                holder: engine.port.holder(),
            },
        )?;
        engine.stats.waits_memory_port += 1;
    }
    Ok(())
}
