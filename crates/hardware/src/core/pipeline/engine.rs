//! The cycle driver.
//!
//! [`Engine`] owns every scheduling structure plus the two committed-state
//! collaborators and advances them one cycle per [`Engine::tick`]. Each tick
//! runs, in order:
//! 1. **Reclaim:** Land a finished store write, deliver last cycle's CDB result,
//!    resolve finished address generations, free functional units, and retire
//!    LSQ entries from the head.
//! 2. **Termination:** Stop once the ROB is empty, the program is exhausted and
//!    memory is idle; fail once the cycle bound is exceeded.
//! 3. **Issue:** At most one instruction enters the ROB and an RS pool or the LSQ.
//! 4. **Advance:** Walk the ROB in program order, moving entries across
//!    ISSUE->EX, EX->MEM, EX->WB and MEM->WB as resources allow.
//! 5. **Commit:** Retire at most one instruction from the ROB head.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, trace, warn};

use crate::common::{MemAddr, SimError, Structure};
use crate::config::Config;
use crate::core::arch::{MemoryStore, RegisterStore};
use crate::core::pipeline::cdb::{Broadcast, CommonDataBus};
use crate::core::pipeline::lsq::{LoadStoreQueue, MemKind};
use crate::core::pipeline::rat::RegisterAliasTable;
use crate::core::pipeline::reservation::ReservationStations;
use crate::core::pipeline::rob::{Rob, RobState, RobTag};
use crate::core::pipeline::stages;
use crate::core::pipeline::timing::TimingTable;
use crate::core::units::lsu::MemoryPort;
use crate::core::units::pool::FunctionalUnitPool;
use crate::isa::{Instruction, UnitClass};
use crate::stats::SimStats;

/// Outcome of one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    /// Work remains.
    Running,
    /// The ROB drained after the last instruction; nothing can make further progress.
    Finished,
}

/// The dynamic scheduling engine.
#[derive(Debug)]
pub struct Engine<R, M> {
    pub(crate) config: Config,
    pub(crate) program: Vec<Instruction>,
    /// Index of the next instruction to issue.
    pub(crate) next: usize,
    pub(crate) cycle: u64,
    pub(crate) rat: RegisterAliasTable,
    pub(crate) rs: ReservationStations,
    pub(crate) rob: Rob,
    pub(crate) lsq: LoadStoreQueue,
    pub(crate) cdb: CommonDataBus,
    pub(crate) units: FunctionalUnitPool,
    pub(crate) port: MemoryPort,
    pub(crate) timing: TimingTable,
    /// Address generations in flight: effective address and the cycle it becomes known.
    pub(crate) agen: BTreeMap<RobTag, (MemAddr, u64)>,
    /// LSQ entries that are done and leave once they reach the head.
    pub(crate) pending_dequeue: BTreeSet<RobTag>,
    /// Structure that stalled issue of the next instruction, reported when it issues.
    pub(crate) issue_stall: Option<Structure>,
    pub(crate) commit_log: Vec<usize>,
    pub(crate) stats: SimStats,
    pub(crate) regs: R,
    pub(crate) mem: M,
}

impl<R: RegisterStore, M: MemoryStore> Engine<R, M> {
    /// Builds an engine for `program` over the given committed state.
    ///
    /// # Errors
    ///
    /// `Config` if the configuration fails validation, `MalformedRegister`
    /// if an instruction names a register outside its bank.
    pub fn new(
        config: Config,
        program: Vec<Instruction>,
        regs: R,
        mem: M,
    ) -> Result<Self, SimError> {
        config.validate()?;
        for inst in &program {
            for reg in inst.registers() {
                let _ = reg.validate()?;
            }
        }
        let units = &config.units;
        let rs_capacity = UnitClass::ARITHMETIC.map(|c| units.arithmetic(c).rs_entries);
        let counts = UnitClass::ALL.map(|c| match c {
            UnitClass::LoadStore => units.load_store.count,
            _ => units.arithmetic(c).count,
        });
        Ok(Self {
            rat: RegisterAliasTable::new(),
            rs: ReservationStations::new(rs_capacity),
            rob: Rob::new(config.rob.entries),
            lsq: LoadStoreQueue::new(units.load_store.queue_entries),
            cdb: CommonDataBus::new(),
            units: FunctionalUnitPool::new(counts),
            port: MemoryPort::new(),
            timing: TimingTable::new(),
            agen: BTreeMap::new(),
            pending_dequeue: BTreeSet::new(),
            issue_stall: None,
            commit_log: Vec::new(),
            stats: SimStats::default(),
            next: 0,
            cycle: 0,
            program,
            config,
            regs,
            mem,
        })
    }

    /// Advances simulated time by one cycle.
    ///
    /// # Errors
    ///
    /// `NonConvergence` once the cycle bound is exceeded, or an internal
    /// defect (`UnknownTag`, `Invariant`).
    pub fn tick(&mut self) -> Result<Status, SimError> {
        self.cycle += 1;
        self.reclaim()?;

        if self.is_drained() {
            debug!(cycle = self.cycle, "reorder buffer drained");
            return Ok(Status::Finished);
        }
        if self.cycle > self.config.general.max_cycles {
            warn!(
                cycle = self.cycle,
                in_flight = self.rob.len(),
                "scheduling did not converge"
            );
            return Err(SimError::NonConvergence {
                cycles: self.config.general.max_cycles,
            });
        }
        self.stats.cycles = self.cycle;

        let issued = stages::issue_stage(self)?;
        for tag in self.rob.tags() {
            if Some(tag) == issued {
                continue;
            }
            let state = self
                .rob
                .find_entry(tag)
                .map(|e| e.state)
                .ok_or(SimError::UnknownTag(tag))?;
            match state {
                RobState::Issue => stages::execute_stage(self, tag)?,
                RobState::Execute => stages::complete_stage(self, tag)?,
                RobState::Memory => stages::mem_stage(self, tag)?,
                RobState::WriteBack | RobState::Committed => {}
            }
        }
        let _ = stages::commit_stage(self)?;

        if self.config.general.trace {
            debug!(
                cycle = self.cycle,
                rob = self.rob.len(),
                rs = self.rs.len(),
                lsq = self.lsq.len(),
                cdb = ?self.cdb.holder(),
                memory = ?self.port.holder(),
                rat = ?self.rat.bindings(),
                "cycle state"
            );
        }
        Ok(Status::Running)
    }

    /// Ticks until the ROB drains.
    ///
    /// Returns the number of cycles in which the engine did work.
    pub fn run(&mut self) -> Result<u64, SimError> {
        while self.tick()? == Status::Running {}
        Ok(self.stats.cycles)
    }

    fn is_drained(&self) -> bool {
        self.rob.is_empty() && self.next >= self.program.len() && self.port.is_free()
    }

    /// Releases last cycle's resources.
    fn reclaim(&mut self) -> Result<(), SimError> {
        let cycle = self.cycle;

        if let Some(write) = self.port.reclaim(cycle) {
            trace!(cycle, addr = %write.addr, value = %write.value, "store written");
            self.mem.write(write.addr, write.value);
            self.stats.memory_writes += 1;
            let _ = self.pending_dequeue.insert(write.tag);
        }

        if let Some(Broadcast { tag, value, .. }) = self.cdb.take_pending() {
            let waiting = self.rs.broadcast_update(tag, value) + self.lsq.broadcast_update(tag, value);
            trace!(cycle, %tag, %value, waiting, "result delivered");
            self.rob.update_value(tag, value)?;
        }

        let resolved: Vec<(RobTag, MemAddr)> = self
            .agen
            .iter()
            .filter(|(_, (_, ready))| *ready <= cycle)
            .map(|(tag, (addr, _))| (*tag, *addr))
            .collect();
        for (tag, addr) in resolved {
            let _ = self.agen.remove(&tag);
            self.lsq.resolve_address(tag, addr)?;
            if self.lsq.entry(tag).is_some_and(|e| e.kind == MemKind::Store) {
                self.rob.set_address(tag, addr)?;
            }
            trace!(cycle, %tag, %addr, "address resolved");
        }

        self.units.reclaim(cycle);

        while let Some(head) = self.lsq.head().map(|e| e.tag)
            && self.pending_dequeue.remove(&head)
        {
            let _ = self.lsq.dequeue(head);
        }
        Ok(())
    }

    /// Current cycle.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    /// The configuration the engine runs with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Program indices in commit order.
    pub fn commit_log(&self) -> &[usize] {
        &self.commit_log
    }

    /// Every result placed on the common data bus.
    pub fn cdb_history(&self) -> &[Broadcast] {
        self.cdb.history()
    }

    /// Per-instruction stage timings and hazards.
    pub fn timing(&self) -> &TimingTable {
        &self.timing
    }

    /// The register alias table.
    pub fn rat(&self) -> &RegisterAliasTable {
        &self.rat
    }

    /// The reorder buffer.
    pub fn rob(&self) -> &Rob {
        &self.rob
    }

    /// The load-store queue.
    pub fn lsq(&self) -> &LoadStoreQueue {
        &self.lsq
    }

    /// The reservation stations.
    pub fn reservation_stations(&self) -> &ReservationStations {
        &self.rs
    }

    /// Statistics collected so far.
    pub fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// The program being scheduled.
    pub fn program(&self) -> &[Instruction] {
        &self.program
    }

    /// Committed register state.
    pub fn registers(&self) -> &R {
        &self.regs
    }

    /// Committed memory state.
    pub fn memory(&self) -> &M {
        &self.mem
    }

    /// Consumes the engine, returning the committed state.
    pub fn into_parts(self) -> (R, M) {
        (self.regs, self.mem)
    }
}
