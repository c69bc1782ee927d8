//! # Memory Collaborator Tests
//!
//! Drives the engine over a mocked memory to check exactly which reads and
//! writes reach it.

use mockall::predicate::eq;
use tomasim_core::common::{ArchReg, MemAddr, Value};
use tomasim_core::config::Config;
use tomasim_core::core::Engine;
use tomasim_core::core::arch::{ArchRegisterFile, RegisterStore};
use tomasim_core::isa::Instruction;

use crate::common::harness::init_tracing;
use crate::common::mocks::memory::MockDataMemory;

#[test]
fn test_load_reads_memory_once() {
    init_tracing();
    let mut mem = MockDataMemory::new();
    let _ = mem
        .expect_read()
        .with(eq(MemAddr(8)))
        .times(1)
        .return_const(Value::Float(1.25));
    let _ = mem.expect_write().times(0);

    let program = vec![Instruction::load(ArchReg::Fp(0), 2, ArchReg::Int(0))];
    let mut engine = Engine::new(Config::default(), program, ArchRegisterFile::new(), mem).unwrap();
    let _ = engine.run().unwrap();

    assert_eq!(engine.registers().read(ArchReg::Fp(0)), Value::Float(1.25));
}

#[test]
fn test_store_writes_at_commit_and_forwarded_load_skips_memory() {
    init_tracing();
    let mut mem = MockDataMemory::new();
    let _ = mem.expect_read().times(0);
    let _ = mem
        .expect_write()
        .with(eq(MemAddr(4)), eq(Value::Float(2.5)))
        .times(1)
        .return_const(());

    let mut regs = ArchRegisterFile::new();
    regs.write(ArchReg::Fp(2), Value::Float(2.5));
    let program = vec![
        Instruction::store(ArchReg::Fp(2), 1, ArchReg::Int(0)),
        Instruction::load(ArchReg::Fp(4), 1, ArchReg::Int(0)),
    ];
    let mut engine = Engine::new(Config::default(), program, regs, mem).unwrap();
    let _ = engine.run().unwrap();

    assert_eq!(engine.registers().read(ArchReg::Fp(4)), Value::Float(2.5));
    assert_eq!(engine.stats().loads_forwarded, 1);
}

#[test]
fn test_store_value_comes_from_producer() {
    init_tracing();
    let mut mem = MockDataMemory::new();
    let _ = mem
        .expect_write()
        .with(eq(MemAddr(0)), eq(Value::Int(12)))
        .times(1)
        .return_const(());

    let program = vec![
        Instruction::addi(ArchReg::Int(1), ArchReg::Int(0), 12),
        Instruction::store(ArchReg::Int(1), 0, ArchReg::Int(0)),
    ];
    let mut engine = Engine::new(Config::default(), program, ArchRegisterFile::new(), mem).unwrap();
    let _ = engine.run().unwrap();

    assert_eq!(engine.commit_log(), &[0, 1]);
    let (regs, _mem) = engine.into_parts();
    assert_eq!(regs.read(ArchReg::Int(1)), Value::Int(12));
}
