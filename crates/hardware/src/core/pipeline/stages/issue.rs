//! Issue (IS) Stage.
//!
//! This module implements in-order issue. Each cycle it performs the following
//! for the next instruction of the program, if there is one:
//! 1. **Capacity:** Checks the ROB and the target RS pool or LSQ; a full structure stalls issue.
//! 2. **Operand Read:** Resolves each source through the RAT to a value or a producer tag.
//! 3. **Renaming:** Allocates the ROB entry and binds the destination register to its tag.
//! 4. **Placement:** Admits the instruction to its RS pool or the LSQ.

use tracing::{debug, trace};

use crate::common::{ArchReg, SimError, Structure, Value};
use crate::core::arch::{MemoryStore, RegisterStore};
use crate::core::pipeline::engine::Engine;
use crate::core::pipeline::lsq::MemKind;
use crate::core::pipeline::reservation::{Operand, RsEntry};
use crate::core::pipeline::rob::RobTag;
use crate::core::pipeline::timing::Hazard;
use crate::isa::{Instruction, Sources};

/// Executes the issue stage.
///
/// Returns the tag of the instruction issued this cycle, or `None` when the
/// program is exhausted or issue stalled.
///
/// # Errors
///
/// Only internal defects; a full structure is a stall, not an error.
pub fn issue_stage<R: RegisterStore, M: MemoryStore>(
    engine: &mut Engine<R, M>,
) -> Result<Option<RobTag>, SimError> {
    let Some(&inst) = engine.program.get(engine.next) else {
        return Ok(None);
    };
    let index = engine.next;
    let cycle = engine.cycle;

    match check_capacity(engine, &inst) {
        Ok(()) => {}
        Err(SimError::CapacityExceeded(structure)) => {
            match structure {
                Structure::ReorderBuffer => engine.stats.stalls_rob_full += 1,
                Structure::ReservationStation(_) => engine.stats.stalls_rs_full += 1,
                Structure::LoadStoreQueue => engine.stats.stalls_lsq_full += 1,
            }
            trace!(cycle, index, %structure, "issue stalled");
            engine.issue_stall = Some(structure);
            return Ok(None);
        }
        Err(e) => return Err(e),
    }

    // Sources are read before the destination is rebound, so `ADD R1, R1, R2`
    // sees the previous producer of R1.
    let mut raw = Vec::new();
    let mut read = |reg: ArchReg| -> Result<Operand, SimError> {
        let (operand, producer) = read_operand(engine, reg)?;
        if let Some(producer) = producer {
            raw.push(Hazard::Raw { reg, producer });
        }
        Ok(operand)
    };
    let placement = match inst.sources {
        Sources::Registers(rs, rt) => Placement::Station(read(rs)?, read(rt)?),
        Sources::Immediate(rs, imm) => Placement::Station(read(rs)?, Operand::Ready(Value::Int(imm))),
        Sources::Memory { offset, base, data } => {
            let data = data.map(&mut read).transpose()?;
            Placement::Queue {
                base: read(base)?,
                offset,
                data,
            }
        }
    };

    let tag = engine.rob.admit(inst, index)?;
    if let Some(rd) = inst.dest {
        engine.rat.bind(rd, tag);
    }
    match placement {
        Placement::Station(lhs, rhs) => engine.rs.admit(RsEntry {
            opcode: inst.opcode,
            tag,
            index,
            lhs,
            rhs,
        })?,
        Placement::Queue { base, offset, data } => {
            let kind = if inst.opcode.is_load() {
                MemKind::Load
            } else {
                MemKind::Store
            };
            engine.lsq.admit(kind, base, offset, data, tag, index)?;
        }
    }

    engine.timing.push(index, inst.to_string(), cycle)?;
    for hazard in raw {
        let _ = engine.timing.note(index, hazard)?;
    }
    if let Some(structure) = engine.issue_stall.take() {
        let _ = engine.timing.note(index, Hazard::IssueStall(structure))?;
    }
    engine.next += 1;
    engine.stats.instructions_issued += 1;
    debug!(cycle, index, %tag, %inst, "issued");
    Ok(Some(tag))
}

/// Where an issued instruction waits for execution.
enum Placement {
    Station(Operand, Operand),
    Queue {
        base: Operand,
        offset: i64,
        data: Option<Operand>,
    },
}

/// Fails with `CapacityExceeded` when the instruction cannot be placed.
fn check_capacity<R, M>(engine: &Engine<R, M>, inst: &Instruction) -> Result<(), SimError> {
    if engine.rob.is_full() {
        return Err(SimError::CapacityExceeded(Structure::ReorderBuffer));
    }
    if inst.opcode.is_memory() {
        if engine.lsq.is_full() {
            return Err(SimError::CapacityExceeded(Structure::LoadStoreQueue));
        }
    } else {
        let class = inst.opcode.unit_class();
        if !engine.rs.has_space(class) {
            return Err(SimError::CapacityExceeded(Structure::ReservationStation(
                class.name(),
            )));
        }
    }
    Ok(())
}

/// Reads a source register through the RAT.
///
/// Returns the operand and, when it is still pending, the index of its producer.
fn read_operand<R: RegisterStore, M>(
    engine: &Engine<R, M>,
    reg: ArchReg,
) -> Result<(Operand, Option<usize>), SimError> {
    let Some(tag) = engine.rat.rename(reg) else {
        return Ok((Operand::Ready(engine.regs.read(reg)), None));
    };
    let producer = engine.rob.find_entry(tag).ok_or(SimError::UnknownTag(tag))?;
    Ok(match producer.value {
        Some(value) => (Operand::Ready(value), None),
        None => (Operand::Pending(tag), Some(producer.index)),
    })
}
