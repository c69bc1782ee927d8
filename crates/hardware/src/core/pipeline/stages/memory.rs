//! Memory Access (MEM) Stage.
//!
//! Loads only. Once its address is known, a load asks the load-store queue
//! whether an earlier store can supply or might alias its value:
//! 1. **Forwarded:** The nearest earlier same-address store has its value; the load
//!    takes it and spends one cycle in MEM.
//! 2. **Miss:** No earlier store can alias; the load reads memory through the single
//!    port, holding it for the memory latency.
//! 3. **Blocked:** An earlier store's address or value is unknown, or the port is busy;
//!    the load retries next cycle.

use tracing::trace;

use crate::common::SimError;
use crate::core::arch::{MemoryStore, RegisterStore};
use crate::core::pipeline::engine::Engine;
use crate::core::pipeline::lsq::ForwardResult;
use crate::core::pipeline::rob::{RobState, RobTag};
use crate::core::pipeline::stages::writeback;
use crate::core::pipeline::timing::{Hazard, Resource, StageSpan};

/// Attempts the EX->MEM transition for the load `tag`.
pub(crate) fn access<R: RegisterStore, M: MemoryStore>(
    engine: &mut Engine<R, M>,
    tag: RobTag,
    index: usize,
) -> Result<(), SimError> {
    let cycle = engine.cycle;
    let (value, duration) = match engine.lsq.try_forward(tag)? {
        ForwardResult::Hit(value) => {
            engine.lsq.set_value(tag, value, true)?;
            engine.stats.loads_forwarded += 1;
            trace!(cycle, index, %value, "load forwarded");
            (value, 1)
        }
        ForwardResult::Miss => {
            let latency = engine.config.units.load_store.mem_latency;
            if !engine.port.begin_read(index, cycle + latency) {
                let _ = engine.timing.note(
                    index,
                    Hazard::Structural {
                        resource: Resource::MemoryPort,
                        holder: engine.port.holder(),
                    },
                )?;
                engine.stats.waits_memory_port += 1;
                return Ok(());
            }
            let addr = engine
                .lsq
                .entry(tag)
                .and_then(|e| e.address)
                .ok_or(SimError::UnknownTag(tag))?;
            let value = engine.mem.read(addr);
            engine.lsq.set_value(tag, value, false)?;
            engine.stats.memory_reads += 1;
            trace!(cycle, index, %addr, %value, "load reads memory");
            (value, latency)
        }
        ForwardResult::Stall { blocker } => {
            let store = engine
                .lsq
                .entry(blocker)
                .map(|e| e.index)
                .ok_or(SimError::UnknownTag(blocker))?;
            let _ = engine.timing.note(index, Hazard::MemoryOrder { store })?;
            engine.stats.waits_memory_order += 1;
            return Ok(());
        }
    };

    engine.rob.set_outcome(tag, Some(value), cycle + duration)?;
    engine.rob.update_state(tag, RobState::Memory)?;
    engine.timing.set_memory(index, StageSpan::new(cycle, duration))?;
    Ok(())
}

/// Attempts the MEM->WB transition for the load `tag`.
pub fn mem_stage<R: RegisterStore, M: MemoryStore>(
    engine: &mut Engine<R, M>,
    tag: RobTag,
) -> Result<(), SimError> {
    let entry = engine.rob.find_entry(tag).ok_or(SimError::UnknownTag(tag))?;
    if entry.ready_at.is_none_or(|at| at > engine.cycle) {
        return Ok(());
    }
    let index = entry.index;
    let value = entry
        .result
        .ok_or_else(|| SimError::Invariant(format!("{tag} left memory without a value")))?;
    if writeback::wb_stage(engine, tag, index, value)? {
        let _ = engine.pending_dequeue.insert(tag);
    }
    Ok(())
}
