//! Run report.
//!
//! Renders what a finished (or interrupted) run looks like: one row per issued
//! instruction with its issue, execute, memory, writeback and commit cycles and
//! the hazards that delayed it, followed by the non-zero registers and memory
//! words.

use std::fmt::Write as _;

use crate::core::arch::{ArchRegisterFile, Memory};
use crate::core::pipeline::timing::{StageSpan, TimingEntry, TimingTable};
use crate::core::Engine;

/// Renders the timing table, the registers and the memory.
pub fn render(engine: &Engine<ArchRegisterFile, Memory>) -> String {
    let mut out = render_timing(engine.timing());

    let _ = writeln!(out, "\nRegisters");
    let regs = engine.registers().non_zero();
    if regs.is_empty() {
        let _ = writeln!(out, "  (all zero)");
    }
    for (reg, value) in regs {
        let _ = writeln!(out, "  {:<4} = {value}", reg.to_string());
    }

    let _ = writeln!(out, "\nMemory");
    let words = engine.memory().non_zero();
    if words.is_empty() {
        let _ = writeln!(out, "  (all zero)");
    }
    for (addr, value) in words {
        let _ = writeln!(out, "  [{:>6}] = {value}", addr.val());
    }
    out
}

/// Renders the timing table alone.
pub fn render_timing(table: &TimingTable) -> String {
    let width = table
        .iter()
        .map(|e| e.text.len())
        .max()
        .unwrap_or(0)
        .max("Instruction".len());
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>3}  {:<width$}  {:>5}  {:>9}  {:>9}  {:>5}  {:>9}  Hazards",
        "#", "Instruction", "IS", "EX", "MEM", "WB", "CM"
    );
    for entry in table.iter() {
        let _ = writeln!(out, "{}", render_row(entry, width));
    }
    out
}

fn render_row(entry: &TimingEntry, width: usize) -> String {
    let span = |s: Option<StageSpan>| s.map_or_else(|| "-".to_string(), |s| s.to_string());
    let hazards: Vec<String> = entry.hazards.iter().map(ToString::to_string).collect();
    format!(
        "{:>3}  {:<width$}  {:>5}  {:>9}  {:>9}  {:>5}  {:>9}  {}",
        entry.index,
        entry.text,
        entry.issue,
        span(entry.execute),
        span(entry.memory),
        entry.write_back.map_or_else(|| "-".to_string(), |c| c.to_string()),
        span(entry.commit),
        hazards.join("; ")
    )
    .trim_end()
    .to_string()
}
