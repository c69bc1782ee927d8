//! # Capacity Tests
//!
//! Full structures stall issue; nothing is dropped and program order is kept.

use pretty_assertions::assert_eq;
use tomasim_core::common::{SimError, Structure, Value};
use tomasim_core::config::Config;
use tomasim_core::core::pipeline::timing::Hazard;

use crate::common::harness::TestContext;

#[test]
fn test_full_rob_stalls_issue() {
    let mut config = Config::default();
    config.rob.entries = 2;
    let mut ctx = TestContext::with_config(
        "REG F2 2.0\n\
         MULT.D F0, F2, F2\n\
         MULT.D F4, F2, F2\n\
         MULT.D F6, F2, F2\n\
         MULT.D F8, F2, F2\n",
        config,
    );
    let _ = ctx.run();

    // Slot frees when the first multiply commits in cycle 11; issue runs before commit.
    assert_eq!(ctx.row(2).issue, 12);
    assert!(
        ctx.row(2)
            .hazards
            .contains(&Hazard::IssueStall(Structure::ReorderBuffer))
    );
    assert!(ctx.sim.stats().stalls_rob_full > 0);
    assert_eq!(ctx.sim.engine().commit_log(), &[0, 1, 2, 3]);
    for reg in ["F0", "F4", "F6", "F8"] {
        assert_eq!(ctx.reg(reg), Value::Float(4.0));
    }
}

#[test]
fn test_full_station_pool_stalls_issue() {
    let mut config = Config::default();
    config.units.fp_multiplier.rs_entries = 1;
    let mut ctx = TestContext::with_config("MULT.D F0, F2, F4\nMULT.D F6, F2, F4\n", config);
    let _ = ctx.run();

    // The first multiply leaves its station when it dispatches in cycle 2,
    // after that cycle's issue attempt.
    assert_eq!(ctx.row(1).issue, 3);
    assert!(
        ctx.row(1)
            .hazards
            .contains(&Hazard::IssueStall(Structure::ReservationStation("FP Mul FU")))
    );
    assert_eq!(ctx.sim.stats().stalls_rs_full, 1);
    assert_eq!(ctx.sim.stats().instructions_committed, 2);
}

#[test]
fn test_full_queue_stalls_issue() {
    let mut config = Config::default();
    config.units.load_store.queue_entries = 1;
    let mut ctx = TestContext::with_config(
        "MEM 0 1.0\nMEM 4 2.0\nLD F0, 0(R0)\nLD F2, 1(R0)\n",
        config,
    );
    let _ = ctx.run();

    // The first load writes back in cycle 7 and leaves the queue in cycle 8.
    assert_eq!(ctx.row(1).issue, 8);
    assert!(
        ctx.row(1)
            .hazards
            .contains(&Hazard::IssueStall(Structure::LoadStoreQueue))
    );
    assert_eq!(ctx.sim.stats().stalls_lsq_full, 6);
    assert_eq!(ctx.reg("F0"), Value::Float(1.0));
    assert_eq!(ctx.reg("F2"), Value::Float(2.0));
}

#[test]
fn test_minimal_machine_runs_mixed_program() {
    let mut config = Config::default();
    config.rob.entries = 1;
    config.units.load_store.queue_entries = 1;
    for pool in [
        &mut config.units.int_adder,
        &mut config.units.fp_adder,
        &mut config.units.fp_multiplier,
        &mut config.units.fp_divider,
    ] {
        pool.rs_entries = 1;
    }
    let mut ctx = TestContext::with_config(
        "REG R1 3\nMEM 3 0.5\n\
         LD F0, 0(R1)\n\
         ADD.D F2, F0, F0\n\
         MULT.D F4, F2, F2\n\
         SD F4, 1(R1)\n\
         LD F6, 1(R1)\n\
         ADDI R2, R1, -3\n",
        config,
    );
    let _ = ctx.run();

    assert_eq!(ctx.sim.engine().commit_log(), &[0, 1, 2, 3, 4, 5]);
    assert_eq!(ctx.reg("F4"), Value::Float(1.0));
    assert_eq!(ctx.mem(7), Value::Float(1.0));
    assert_eq!(ctx.reg("F6"), Value::Float(1.0));
    assert_eq!(ctx.reg("R2"), Value::Int(0));
}

#[test]
fn test_capacity_errors_are_recoverable() {
    for structure in [
        Structure::ReorderBuffer,
        Structure::ReservationStation("Int FU"),
        Structure::LoadStoreQueue,
    ] {
        let err = SimError::CapacityExceeded(structure);
        assert!(err.is_recoverable());
        assert!(!err.is_defect());
    }
}
