//! # Report Tests

use tomasim_core::config::Config;

use crate::common::harness::TestContext;

#[test]
fn test_report_lists_rows_hazards_and_state() {
    let mut config = Config::default();
    config.units.fp_adder.latency = 7;
    let mut ctx = TestContext::with_config(
        "REG F2 1.5\nREG F4 2.0\n\
         MULT.D F0, F2, F4\n\
         ADD.D F6, F2, F4\n\
         SD F0, 1(R0)\n",
        config,
    );
    let _ = ctx.run();
    let report = ctx.sim.report();
    let lines: Vec<&str> = report.lines().collect();

    assert!(lines[0].contains("Instruction"));
    assert!(lines[0].ends_with("Hazards"));
    assert!(lines[1].contains("MULT.D F0, F2, F4"));
    assert!(lines[1].contains("2-9"));
    assert!(lines[2].ends_with("structural on CDB (from 0)"));
    assert!(lines[3].contains("SD F0, 1(R0)"));
    assert!(lines[3].contains("RAW on F0 (from 0)"));

    assert!(report.contains("Registers"));
    assert!(report.contains("F0   = 3.0"));
    assert!(report.contains("F6   = 3.5"));
    assert!(report.contains("Memory"));
    assert!(report.contains("[     4] = 3.0"));
}

#[test]
fn test_report_of_empty_run() {
    let mut ctx = TestContext::new("");
    let _ = ctx.run();
    let report = ctx.sim.report();

    assert_eq!(report.lines().count(), 7);
    assert!(report.contains("(all zero)"));
}
