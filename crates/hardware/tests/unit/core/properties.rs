//! # Scheduling Properties
//!
//! Random programs on random machine shapes must commit in program order,
//! use the bus at most once per cycle, and end in the same state as a plain
//! sequential interpreter.

use proptest::collection::vec;
use proptest::prelude::*;
use tomasim_core::Simulator;
use tomasim_core::common::{ArchReg, MemAddr, Value};
use tomasim_core::config::Config;
use tomasim_core::core::arch::RegisterStore;
use tomasim_core::isa::{Instruction, Opcode, UnitClass};
use tomasim_core::sim::Program;

use crate::common::reference::{interpret, same};

fn int_reg() -> impl Strategy<Value = ArchReg> {
    (0u8..4).prop_map(ArchReg::Int)
}

fn fp_reg() -> impl Strategy<Value = ArchReg> {
    (0u8..4).prop_map(ArchReg::Fp)
}

fn arb_instruction() -> impl Strategy<Value = Instruction> {
    prop_oneof![
        (
            prop_oneof![Just(Opcode::Add), Just(Opcode::Sub)],
            int_reg(),
            int_reg(),
            int_reg()
        )
            .prop_map(|(op, rd, rs, rt)| Instruction::arith(op, rd, rs, rt)),
        (int_reg(), int_reg(), -8i64..8).prop_map(|(rd, rs, imm)| Instruction::addi(rd, rs, imm)),
        (
            prop_oneof![Just(Opcode::AddD), Just(Opcode::SubD), Just(Opcode::MulD)],
            fp_reg(),
            fp_reg(),
            fp_reg()
        )
            .prop_map(|(op, fd, fs, ft)| Instruction::arith(op, fd, fs, ft)),
        (fp_reg(), 0i64..4, int_reg()).prop_map(|(fd, off, base)| Instruction::load(fd, off, base)),
        (int_reg(), 0i64..4, int_reg()).prop_map(|(rd, off, base)| Instruction::load(rd, off, base)),
        (fp_reg(), 0i64..4, int_reg()).prop_map(|(fs, off, base)| Instruction::store(fs, off, base)),
        (int_reg(), 0i64..4, int_reg()).prop_map(|(rs, off, base)| Instruction::store(rs, off, base)),
    ]
}

fn arb_config() -> impl Strategy<Value = Config> {
    (
        1usize..6,
        1usize..3,
        1usize..3,
        1usize..4,
        1u64..6,
        1u64..6,
    )
        .prop_map(|(rob, rs, units, lsq, fp_latency, mem_latency)| {
            let mut config = Config::default();
            config.rob.entries = rob;
            for class in UnitClass::ARITHMETIC {
                if let Some(pool) = config.units.arithmetic_mut(class) {
                    pool.rs_entries = rs;
                    pool.count = units;
                }
            }
            config.units.fp_adder.latency = fp_latency;
            config.units.fp_multiplier.latency = fp_latency + 2;
            config.units.load_store.queue_entries = lsq;
            config.units.load_store.mem_latency = mem_latency;
            config.units.load_store.count = units;
            config
        })
}

fn seeded(instructions: Vec<Instruction>) -> Program {
    Program {
        instructions,
        registers: vec![
            (ArchReg::Int(1), Value::Int(1)),
            (ArchReg::Int(2), Value::Int(2)),
            (ArchReg::Int(3), Value::Int(5)),
            (ArchReg::Fp(1), Value::Float(1.5)),
            (ArchReg::Fp(2), Value::Float(-2.0)),
            (ArchReg::Fp(3), Value::Float(0.25)),
        ],
        memory: (0..24).map(|a| (MemAddr(a), Value::Float(a as f64 / 2.0))).collect(),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_matches_sequential_execution(
        instructions in vec(arb_instruction(), 1..24),
        config in arb_config(),
    ) {
        let program = seeded(instructions);
        let count = program.instructions.len();
        let (want_regs, want_mem) = interpret(&program, config.general.offset_scale);

        let mut sim = Simulator::new(config, program).unwrap();
        let run = sim.run();
        prop_assert!(run.is_ok(), "run failed: {:?}", run);
        let engine = sim.engine();

        // In-order commit of every instruction.
        let expected: Vec<usize> = (0..count).collect();
        prop_assert_eq!(engine.commit_log(), expected.as_slice());

        // One broadcast per cycle at most.
        let history = engine.cdb_history();
        prop_assert!(history.windows(2).all(|w| w[0].cycle < w[1].cycle));

        // Stage order within each row, commit order across rows.
        let mut last_commit = 0;
        for row in engine.timing().iter() {
            let ex = row.execute.map(|s| s.begin).unwrap_or_default();
            let wb = row.write_back.unwrap_or_default();
            let cm = row.commit.map(|s| s.begin).unwrap_or_default();
            prop_assert!(row.issue < ex, "row {}: issue {} ex {}", row.index, row.issue, ex);
            prop_assert!(ex < wb, "row {}: ex {} wb {}", row.index, ex, wb);
            prop_assert!(wb < cm, "row {}: wb {} cm {}", row.index, wb, cm);
            prop_assert!(last_commit < cm);
            last_commit = cm;
        }

        // Final state equals the sequential interpreter's.
        for reg in (0..4).map(ArchReg::Int).chain((0..4).map(ArchReg::Fp)) {
            let got = engine.registers().read(reg);
            let want = want_regs.read(reg);
            prop_assert!(same(got, want), "{}: got {} want {}", reg, got, want);
        }
        let got_mem = engine.memory().non_zero();
        let want_mem = want_mem.non_zero();
        prop_assert_eq!(got_mem.len(), want_mem.len());
        for ((ga, gv), (wa, wv)) in got_mem.into_iter().zip(want_mem) {
            prop_assert_eq!(ga, wa);
            prop_assert!(same(gv, wv), "MEM[{}]: got {} want {}", ga, gv, wv);
        }
    }
}
