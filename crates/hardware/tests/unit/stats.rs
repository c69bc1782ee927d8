//! # Statistics Verification
//!
//! Checks that a run's counters agree with what the program did.

use pretty_assertions::assert_eq;

use crate::common::harness::TestContext;

#[test]
fn test_counters_after_mixed_program() {
    let mut ctx = TestContext::new(
        "REG F2 2.0\nMEM 0 1.0\n\
         LD F0, 0(R0)\n\
         ADD.D F4, F0, F2\n\
         MULT.D F6, F4, F2\n\
         DIV.D F8, F6, F2\n\
         ADDI R1, R0, 4\n\
         SUB R2, R1, R1\n\
         SD F8, 1(R0)\n\
         LD F10, 1(R0)\n",
    );
    let cycles = ctx.run();
    let stats = ctx.sim.stats();

    assert_eq!(stats.cycles, cycles);
    assert_eq!(stats.instructions_issued, 8);
    assert_eq!(stats.instructions_committed, 8);
    assert_eq!(
        (
            stats.inst_load,
            stats.inst_store,
            stats.inst_int,
            stats.inst_fp_add,
            stats.inst_fp_mul,
            stats.inst_fp_div
        ),
        (2, 1, 2, 1, 1, 1)
    );
    // The second load is served by the store ahead of it.
    assert_eq!(stats.loads_forwarded, 1);
    assert_eq!(stats.memory_reads, 1);
    assert_eq!(stats.memory_writes, 1);
    // Every instruction, store included, publishes once.
    assert_eq!(stats.cdb_broadcasts, 8);
    assert!(stats.waits_raw > 0);
    assert!(stats.ipc() > 0.0 && stats.ipc() < 1.0);
    assert!((stats.ipc() * stats.cpi() - 1.0).abs() < 1e-9);
}

#[test]
fn test_rendered_sections() {
    let mut ctx = TestContext::new("ADDI R1, R0, 1\n");
    let _ = ctx.run();
    let stats = ctx.sim.stats();

    let all = stats.render_sections(&[]);
    for heading in ["ISSUE STALLS", "HAZARD WAITS", "INSTRUCTION MIX", "MEMORY AND CDB"] {
        assert!(all.contains(heading), "missing {heading}");
    }
    assert!(all.contains("sim_insts                1"));

    let some = stats.render_sections(&["memory".to_string()]);
    assert!(some.contains("cdb.broadcasts         1"));
    assert!(!some.contains("INSTRUCTION MIX"));
}
