//! Execute (EX) Stage.
//!
//! This module moves instructions into and out of the functional units. It performs the following:
//! 1. **Dispatch:** An RS entry with both operands resolved takes a free unit of its
//!    class; its result is computed at dispatch and the RS slot is released.
//! 2. **Address Generation:** A memory operation with a resolved base takes a free
//!    load/store unit; its effective address becomes known after the unit's latency.
//! 3. **Completion:** Once the latency has elapsed, arithmetic results and store
//!    values go to the CDB and loads move on to memory access.

use tracing::trace;

use crate::common::{MemAddr, SimError};
use crate::core::arch::{MemoryStore, RegisterStore};
use crate::core::pipeline::engine::Engine;
use crate::core::pipeline::reservation::{Operand, RsEntry};
use crate::core::pipeline::rob::{RobState, RobTag};
use crate::core::pipeline::stages::{memory, writeback};
use crate::core::pipeline::timing::{Hazard, Resource, StageSpan};
use crate::core::units;
use crate::isa::UnitClass;

/// Attempts the ISSUE->EX transition for `tag`.
///
/// # Errors
///
/// Only internal defects; missing operands or units leave the entry waiting.
pub fn execute_stage<R: RegisterStore, M: MemoryStore>(
    engine: &mut Engine<R, M>,
    tag: RobTag,
) -> Result<(), SimError> {
    let entry = engine.rob.find_entry(tag).ok_or(SimError::UnknownTag(tag))?;
    let (index, opcode) = (entry.index, entry.inst.opcode);
    let cycle = engine.cycle;
    let class = opcode.unit_class();

    let operands = if opcode.is_memory() {
        if !engine.lsq.address_ready(tag)? {
            engine.stats.waits_raw += 1;
            return Ok(());
        }
        None
    } else {
        if !engine.rs.operands_ready(tag)? {
            engine.stats.waits_raw += 1;
            return Ok(());
        }
        let pair = engine
            .rs
            .entry(tag)
            .and_then(RsEntry::operands)
            .ok_or(SimError::UnknownTag(tag))?;
        Some(pair)
    };

    if !engine.units.has_free(class) {
        let holder = engine.units.holder(class);
        let _ = engine.timing.note(
            index,
            Hazard::Structural {
                resource: Resource::Unit(class),
                holder,
            },
        )?;
        engine.stats.waits_unit += 1;
        trace!(cycle, index, %class, ?holder, "waiting for functional unit");
        return Ok(());
    }

    let latency = match class {
        UnitClass::LoadStore => engine.config.units.load_store.ex_latency,
        _ => engine.config.units.arithmetic(class).latency,
    };
    let done_at = cycle + latency;
    let _ = engine.units.acquire(class, index, done_at);

    match operands {
        Some((lhs, rhs)) => {
            let result = units::compute(opcode, lhs, rhs)?;
            let _ = engine.rs.release(tag)?;
            engine.rob.set_outcome(tag, Some(result), done_at)?;
        }
        None => {
            let queued = engine.lsq.entry(tag).ok_or(SimError::UnknownTag(tag))?;
            let base = queued
                .base
                .value()
                .ok_or_else(|| SimError::Invariant(format!("{tag} dispatched without a base")))?;
            let addr = MemAddr::effective(
                queued.offset,
                engine.config.general.offset_scale,
                base.as_i64(),
            );
            let _ = engine.agen.insert(tag, (addr, done_at));
            engine.rob.set_outcome(tag, None, done_at)?;
        }
    }
    engine.rob.update_state(tag, RobState::Execute)?;
    engine.timing.set_execute(index, StageSpan::new(cycle, latency))?;
    trace!(cycle, index, %class, done_at, "dispatched");
    Ok(())
}

/// Moves `tag` out of EX once its latency has elapsed.
///
/// Arithmetic results and store values are broadcast; loads begin memory access.
pub fn complete_stage<R: RegisterStore, M: MemoryStore>(
    engine: &mut Engine<R, M>,
    tag: RobTag,
) -> Result<(), SimError> {
    let entry = engine.rob.find_entry(tag).ok_or(SimError::UnknownTag(tag))?;
    let (index, opcode, result) = (entry.index, entry.inst.opcode, entry.result);
    if entry.ready_at.is_none_or(|at| at > engine.cycle) {
        return Ok(());
    }

    if opcode.is_load() {
        return memory::access(engine, tag, index);
    }

    let value = if opcode.is_store() {
        if !engine.lsq.store_value_ready(tag)? {
            engine.stats.waits_raw += 1;
            return Ok(());
        }
        engine
            .lsq
            .entry(tag)
            .and_then(|e| e.data)
            .and_then(Operand::value)
            .ok_or_else(|| SimError::Invariant(format!("{tag} is a store without data")))?
    } else {
        result.ok_or_else(|| SimError::Invariant(format!("{tag} finished without a result")))?
    };
    let _ = writeback::wb_stage(engine, tag, index, value)?;
    Ok(())
}
