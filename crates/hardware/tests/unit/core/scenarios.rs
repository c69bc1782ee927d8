//! # Scheduling Scenarios
//!
//! Small programs whose cycle-by-cycle timing is known in advance, run under
//! the default machine unless a test says otherwise.

use pretty_assertions::assert_eq;
use tomasim_core::common::{ArchReg, SimError, Value};
use tomasim_core::config::Config;
use tomasim_core::core::arch::{ArchRegisterFile, Memory};
use tomasim_core::core::pipeline::timing::{Hazard, Resource, StageSpan};
use tomasim_core::core::{Engine, Status};
use tomasim_core::isa::{Instruction, Opcode, UnitClass};
use tomasim_core::sim::{Program, Simulator, parse_program};

use crate::common::harness::TestContext;

#[test]
fn test_dependent_adds_wait_for_broadcast() {
    let mut ctx = TestContext::new("ADDI R1, R0, 5\nADD R2, R1, R1\n");
    let cycles = ctx.run();

    assert_eq!((ctx.row(0).issue, ctx.ex(0), ctx.wb(0), ctx.cm(0)), (1, 2, 3, 4));
    assert_eq!((ctx.row(1).issue, ctx.ex(1), ctx.wb(1), ctx.cm(1)), (2, 4, 5, 6));
    assert_eq!(cycles, 6);
    assert_eq!(ctx.reg("R2"), Value::Int(10));
    assert!(ctx.row(1).hazards.contains(&Hazard::Raw {
        reg: ArchReg::Int(1),
        producer: 0,
    }));
    assert!(ctx.sim.engine().rat().bindings().is_empty());
}

#[test]
fn test_single_multiplier_serializes_independent_multiplies() {
    let mut ctx = TestContext::new(
        "REG F2 1.5\nREG F4 2.0\nMULT.D F0, F2, F4\nMULT.D F6, F2, F4\nMULT.D F8, F2, F4\n",
    );
    let cycles = ctx.run();

    assert_eq!([ctx.ex(0), ctx.ex(1), ctx.ex(2)], [2, 10, 18]);
    assert_eq!([ctx.wb(0), ctx.wb(1), ctx.wb(2)], [10, 18, 26]);
    assert_eq!([ctx.cm(0), ctx.cm(1), ctx.cm(2)], [11, 19, 27]);
    assert_eq!(cycles, 27);
    assert_eq!(ctx.row(0).execute, Some(StageSpan::new(2, 8)));

    let busy = |holder| Hazard::Structural {
        resource: Resource::Unit(UnitClass::FpMultiplier),
        holder: Some(holder),
    };
    assert!(ctx.row(1).hazards.contains(&busy(0)));
    assert!(ctx.row(2).hazards.contains(&busy(1)));
    assert_eq!(ctx.reg("F8"), Value::Float(3.0));
    assert_eq!(ctx.sim.stats().waits_unit, 7 + 14);
}

#[test]
fn test_cdb_tie_goes_to_older_instruction() {
    let mut config = Config::default();
    config.units.fp_adder.latency = 7;
    let mut ctx = TestContext::with_config("MULT.D F0, F2, F4\nADD.D F6, F2, F4\n", config);
    let _ = ctx.run();

    assert_eq!((ctx.ex(0), ctx.ex(1)), (2, 3));
    assert_eq!((ctx.wb(0), ctx.wb(1)), (10, 11));
    assert_eq!((ctx.cm(0), ctx.cm(1)), (11, 12));
    assert!(ctx.row(1).hazards.contains(&Hazard::Structural {
        resource: Resource::Cdb,
        holder: Some(0),
    }));

    let cycles: Vec<u64> = ctx
        .sim
        .engine()
        .cdb_history()
        .iter()
        .map(|b| b.cycle)
        .collect();
    assert_eq!(cycles, vec![10, 11]);
    assert_eq!(ctx.sim.stats().waits_cdb, 1);
}

#[test]
fn test_store_forwards_to_later_load() {
    let mut ctx = TestContext::new("REG F2 7.5\nMEM 0 1.0\nSD F2, 0(R1)\nLD F4, 0(R1)\n");
    let cycles = ctx.run();

    // The load takes the store's value, not the stale memory word.
    assert_eq!(ctx.reg("F4"), Value::Float(7.5));
    assert_eq!(ctx.mem(0), Value::Float(7.5));

    assert_eq!((ctx.wb(0), ctx.cm(0)), (3, 4));
    assert_eq!(ctx.row(0).commit, Some(StageSpan::new(4, 4)));
    assert_eq!(ctx.ex(1), 3);
    assert_eq!(ctx.row(1).memory, Some(StageSpan::new(4, 1)));
    assert_eq!((ctx.wb(1), ctx.cm(1)), (5, 6));
    // The store's write still holds memory after the last commit.
    assert_eq!(cycles, 7);

    let stats = ctx.sim.stats();
    assert_eq!(stats.loads_forwarded, 1);
    assert_eq!(stats.memory_reads, 0);
    assert_eq!(stats.memory_writes, 1);
}

#[test]
fn test_load_waits_for_unknown_store_address() {
    let mut ctx = TestContext::new(
        "MEM 0 2\nMEM 4 9.0\nREG F2 3.5\n\
         LD R1, 0(R0)\n\
         SD F2, 0(R1)\n\
         LD F4, 1(R0)\n",
    );
    let _ = ctx.run();

    // The younger load knows its address long before the store does.
    assert!(ctx.ex(2) < ctx.ex(1));
    assert!(ctx.row(2).hazards.contains(&Hazard::MemoryOrder { store: 1 }));
    let memory = ctx.row(2).memory.expect("load accessed memory");
    assert!(memory.begin > ctx.ex(1));

    // Different addresses: the load still reads memory.
    assert_eq!(ctx.mem(2), Value::Float(3.5));
    assert_eq!(ctx.reg("F4"), Value::Float(9.0));
    assert!(ctx.sim.stats().waits_memory_order > 0);
}

#[test]
fn test_load_forwards_once_store_address_matches() {
    let mut ctx = TestContext::new(
        "MEM 0 4\nMEM 4 9.0\nREG F2 3.5\n\
         LD R1, 0(R0)\n\
         SD F2, 0(R1)\n\
         LD F4, 1(R0)\n",
    );
    let _ = ctx.run();

    assert!(ctx.row(2).hazards.contains(&Hazard::MemoryOrder { store: 1 }));
    assert_eq!(ctx.reg("F4"), Value::Float(3.5));
    assert_eq!(ctx.mem(4), Value::Float(3.5));
    assert_eq!(ctx.sim.stats().loads_forwarded, 1);
}

#[test]
fn test_load_waits_for_pending_store_value_then_forwards() {
    let mut ctx = TestContext::new(
        "REG F4 3.0\nREG F6 2.0\nMEM 0 99.0\n\
         DIV.D F2, F4, F6\n\
         SD F2, 0(R0)\n\
         LD F8, 0(R0)\n",
    );
    let _ = ctx.run();

    // Both addresses are known early, but the store's data comes from the divide.
    assert!(ctx.ex(2) < ctx.wb(0));
    assert!(ctx.row(2).hazards.contains(&Hazard::MemoryOrder { store: 1 }));
    let memory = ctx.row(2).memory.expect("load left EX");
    assert!(memory.begin > ctx.wb(0));
    assert_eq!(memory.duration, 1);

    assert_eq!(ctx.reg("F8"), Value::Float(1.5));
    assert_eq!(ctx.mem(0), Value::Float(1.5));
    let stats = ctx.sim.stats();
    assert_eq!(stats.loads_forwarded, 1);
    assert_eq!(stats.memory_reads, 0);
    assert!(stats.waits_memory_order > 0);
}

#[test]
fn test_commit_is_in_order_after_out_of_order_completion() {
    let mut ctx = TestContext::new("REG F2 1.0\nREG F4 2.0\nDIV.D F0, F2, F4\nADDI R1, R0, 3\n");
    let _ = ctx.run();

    assert!(ctx.wb(1) < ctx.wb(0));
    assert!(ctx.cm(1) > ctx.cm(0));
    assert_eq!(ctx.sim.engine().commit_log(), &[0, 1]);
    assert_eq!(ctx.reg("F0"), Value::Float(0.5));
    assert_eq!(ctx.reg("R1"), Value::Int(3));
}

#[test]
fn test_rename_resolves_write_after_write() {
    let mut ctx = TestContext::new("ADDI R1, R0, 1\nADDI R1, R0, 2\nADD R2, R1, R1\n");
    let _ = ctx.run();

    assert!(ctx.row(2).hazards.contains(&Hazard::Raw {
        reg: ArchReg::Int(1),
        producer: 1,
    }));
    assert_eq!(ctx.reg("R1"), Value::Int(2));
    assert_eq!(ctx.reg("R2"), Value::Int(4));
    assert!(ctx.sim.engine().rat().bindings().is_empty());
}

#[test]
fn test_ticks_continue_until_rob_drains() {
    let mut ctx = TestContext::new("REG F2 1.0\nREG F4 2.0\nDIV.D F0, F2, F4\n");
    let mut running = 0;
    loop {
        match ctx.sim.tick().expect("tick succeeds") {
            Status::Running => running += 1,
            Status::Finished => break,
        }
        assert!(running <= 100, "engine never drained");
    }

    // IS 1, EX 2-16, WB 17, CM 18.
    assert_eq!(running, 18);
    assert_eq!(ctx.sim.stats().cycles, 18);
    assert!(ctx.sim.engine().rob().is_empty());
    assert_eq!(ctx.reg("F0"), Value::Float(0.5));
}

#[test]
fn test_cycle_bound_is_fatal() {
    let mut config = Config::default();
    config.general.max_cycles = 10;
    let mut ctx = TestContext::with_config("DIV.D F0, F2, F4\n", config);

    let err = ctx.try_run().unwrap_err();
    assert!(matches!(err, SimError::NonConvergence { cycles: 10 }));
    assert_eq!(ctx.row(0).write_back, None);
    assert!(ctx.sim.engine().commit_log().is_empty());
}

#[test]
fn test_unknown_opcode_stops_before_simulation() {
    let err = parse_program("ADDI R1, R0, 1\nJMP R1\n").unwrap_err();
    assert!(matches!(err, SimError::UnknownOpcode { line: 2, .. }));
    assert!(!err.is_recoverable());
}

#[test]
fn test_register_outside_bank_is_rejected() {
    let program = vec![Instruction::arith(
        Opcode::Add,
        ArchReg::Int(40),
        ArchReg::Int(1),
        ArchReg::Int(2),
    )];
    let err = Engine::new(
        Config::default(),
        program,
        ArchRegisterFile::new(),
        Memory::new(),
    )
    .unwrap_err();
    assert!(matches!(err, SimError::MalformedRegister(ref name) if name == "R40"));

    let load = vec![Instruction::load(ArchReg::Fp(1), 0, ArchReg::Int(32))];
    assert!(matches!(
        Engine::new(Config::default(), load, ArchRegisterFile::new(), Memory::new()),
        Err(SimError::MalformedRegister(_))
    ));

    let seeded = Program {
        registers: vec![(ArchReg::Fp(99), Value::Float(1.0))],
        ..Program::default()
    };
    assert!(matches!(
        Simulator::new(Config::default(), seeded),
        Err(SimError::MalformedRegister(ref name)) if name == "F99"
    ));
}

#[test]
fn test_empty_program_finishes_immediately() {
    let mut ctx = TestContext::new("# nothing to do\n\n");
    assert_eq!(ctx.run(), 0);
    assert!(ctx.sim.engine().timing().is_empty());
}
