//! Simulation statistics collection and reporting.
//!
//! This module tracks scheduling metrics for a run. It provides:
//! 1. **Cycle and IPC:** Total cycles, issued and committed instructions, and derived metrics (IPC, CPI).
//! 2. **Issue stalls:** Cycles the issue stage could not issue, split by the full structure.
//! 3. **Hazards:** Per-cycle waits on operands, functional units, the CDB, the memory port, and earlier stores.
//! 4. **Instruction mix:** Committed instructions by functional-unit class.
//! 5. **Memory:** Reads, writes, forwarded loads, and CDB broadcasts.

use std::fmt::Write as _;
use std::time::Instant;

use crate::isa::Opcode;

/// Simulation statistics structure tracking all scheduling metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions issued.
    pub instructions_issued: u64,
    /// Number of instructions committed (retired).
    pub instructions_committed: u64,

    /// Cycles issue stalled on a full reorder buffer.
    pub stalls_rob_full: u64,
    /// Cycles issue stalled on a full reservation-station pool.
    pub stalls_rs_full: u64,
    /// Cycles issue stalled on a full load-store queue.
    pub stalls_lsq_full: u64,

    /// Instruction-cycles spent waiting for an operand on the CDB.
    pub waits_raw: u64,
    /// Instruction-cycles spent waiting for a free functional unit.
    pub waits_unit: u64,
    /// Instruction-cycles spent waiting for the CDB.
    pub waits_cdb: u64,
    /// Instruction-cycles spent waiting for the memory port.
    pub waits_memory_port: u64,
    /// Instruction-cycles loads spent behind an unresolved earlier store.
    pub waits_memory_order: u64,

    /// Committed integer add/subtract instructions.
    pub inst_int: u64,
    /// Committed floating-point add/subtract instructions.
    pub inst_fp_add: u64,
    /// Committed floating-point multiplies.
    pub inst_fp_mul: u64,
    /// Committed floating-point divides.
    pub inst_fp_div: u64,
    /// Committed loads.
    pub inst_load: u64,
    /// Committed stores.
    pub inst_store: u64,

    /// Loads served from memory.
    pub memory_reads: u64,
    /// Stores written to memory.
    pub memory_writes: u64,
    /// Loads served by store-to-load forwarding.
    pub loads_forwarded: u64,
    /// Results placed on the common data bus.
    pub cdb_broadcasts: u64,
}

impl Default for SimStats {
    /// Returns the default value.
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_issued: 0,
            instructions_committed: 0,
            stalls_rob_full: 0,
            stalls_rs_full: 0,
            stalls_lsq_full: 0,
            waits_raw: 0,
            waits_unit: 0,
            waits_cdb: 0,
            waits_memory_port: 0,
            waits_memory_order: 0,
            inst_int: 0,
            inst_fp_add: 0,
            inst_fp_mul: 0,
            inst_fp_div: 0,
            inst_load: 0,
            inst_store: 0,
            memory_reads: 0,
            memory_writes: 0,
            loads_forwarded: 0,
            cdb_broadcasts: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"issue"`, `"hazards"`, `"instruction_mix"`, `"memory"`.
/// Pass an empty slice to `render_sections` to render all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "issue", "hazards", "instruction_mix", "memory"];

const RULE: &str = "----------------------------------------------------------";
const BANNER: &str = "==========================================================";

impl SimStats {
    /// Counts a committed instruction in the mix.
    pub fn record_commit(&mut self, opcode: Opcode) {
        self.instructions_committed += 1;
        let counter = match opcode {
            Opcode::Add | Opcode::Sub | Opcode::Addi => &mut self.inst_int,
            Opcode::AddD | Opcode::SubD => &mut self.inst_fp_add,
            Opcode::MulD => &mut self.inst_fp_mul,
            Opcode::DivD => &mut self.inst_fp_div,
            Opcode::Ld => &mut self.inst_load,
            Opcode::Sd => &mut self.inst_store,
        };
        *counter += 1;
    }

    /// Instructions committed per cycle.
    pub fn ipc(&self) -> f64 {
        self.instructions_committed as f64 / self.cycles.max(1) as f64
    }

    /// Cycles per committed instruction.
    pub fn cpi(&self) -> f64 {
        self.cycles as f64 / self.instructions_committed.max(1) as f64
    }

    /// Renders only the requested statistics sections.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to render all sections.
    pub fn render_sections(&self, sections: &[String]) -> String {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let cyc = self.cycles.max(1) as f64;
        let instr = self.instructions_committed.max(1) as f64;
        let pct = |n: u64, of: f64| (n as f64 / of) * 100.0;
        let mut out = String::new();

        let _ = writeln!(out, "\n{BANNER}");
        let _ = writeln!(out, "TOMASULO SCHEDULING STATISTICS");
        let _ = writeln!(out, "{BANNER}");
        if want("summary") {
            let seconds = self.start_time.elapsed().as_secs_f64();
            let _ = writeln!(out, "host_seconds             {seconds:.4} s");
            let _ = writeln!(out, "sim_cycles               {}", self.cycles);
            let _ = writeln!(out, "sim_insts_issued         {}", self.instructions_issued);
            let _ = writeln!(out, "sim_insts                {}", self.instructions_committed);
            let _ = writeln!(out, "sim_ipc                  {:.4}", self.ipc());
            let _ = writeln!(out, "sim_cpi                  {:.4}", self.cpi());
            let _ = writeln!(out, "{RULE}");
        }
        if want("issue") {
            let _ = writeln!(out, "ISSUE STALLS");
            for (name, n) in [
                ("stalls.rob_full", self.stalls_rob_full),
                ("stalls.rs_full", self.stalls_rs_full),
                ("stalls.lsq_full", self.stalls_lsq_full),
            ] {
                let _ = writeln!(out, "  {name:<22} {n} ({:.2}%)", pct(n, cyc));
            }
            let _ = writeln!(out, "{RULE}");
        }
        if want("hazards") {
            let _ = writeln!(out, "HAZARD WAITS (instruction-cycles)");
            for (name, n) in [
                ("waits.raw", self.waits_raw),
                ("waits.unit", self.waits_unit),
                ("waits.cdb", self.waits_cdb),
                ("waits.memory_port", self.waits_memory_port),
                ("waits.memory_order", self.waits_memory_order),
            ] {
                let _ = writeln!(out, "  {name:<22} {n}");
            }
            let _ = writeln!(out, "{RULE}");
        }
        if want("instruction_mix") {
            let _ = writeln!(out, "INSTRUCTION MIX");
            for (name, n) in [
                ("op.int", self.inst_int),
                ("op.fp_add", self.inst_fp_add),
                ("op.fp_mul", self.inst_fp_mul),
                ("op.fp_div", self.inst_fp_div),
                ("op.load", self.inst_load),
                ("op.store", self.inst_store),
            ] {
                let _ = writeln!(out, "  {name:<22} {n} ({:.2}%)", pct(n, instr));
            }
            let _ = writeln!(out, "{RULE}");
        }
        if want("memory") {
            let loads = self.memory_reads + self.loads_forwarded;
            let _ = writeln!(out, "MEMORY AND CDB");
            let _ = writeln!(out, "  mem.reads              {}", self.memory_reads);
            let _ = writeln!(out, "  mem.writes             {}", self.memory_writes);
            let _ = writeln!(
                out,
                "  lsq.forwarded          {} ({:.2}% of loads)",
                self.loads_forwarded,
                pct(self.loads_forwarded, loads.max(1) as f64)
            );
            let _ = writeln!(out, "  cdb.broadcasts         {}", self.cdb_broadcasts);
        }
        let _ = writeln!(out, "{BANNER}");
        out
    }

    /// Prints only the requested statistics sections to stdout.
    pub fn print_sections(&self, sections: &[String]) {
        print!("{}", self.render_sections(sections));
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
