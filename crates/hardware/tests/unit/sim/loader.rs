//! # Program File Tests

use std::io::Write;

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;
use tomasim_core::common::{ArchReg, MemAddr, SimError, Value};
use tomasim_core::config::Config;
use tomasim_core::core::arch::{MemoryStore, RegisterStore};
use tomasim_core::isa::Opcode;
use tomasim_core::sim::{Simulator, load_program};

const PROGRAM: &str = "\
# daxpy-style step
REG R1 2
REG F0 3.0
MEM 10 1.5
MEM 14 0.5

ld   f2, 2(r1)       # x
mul.d F4, F0, F2
LD   F6, 3(R1)       # y
ADD.D F6, F4, F6
SD   F6, 3(R1)
";

fn program_file(text: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(text.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_program_from_disk() {
    let file = program_file(PROGRAM);
    let program = load_program(file.path()).unwrap();

    let ops: Vec<Opcode> = program.instructions.iter().map(|i| i.opcode).collect();
    assert_eq!(
        ops,
        vec![Opcode::Ld, Opcode::MulD, Opcode::Ld, Opcode::AddD, Opcode::Sd]
    );
    assert_eq!(program.registers.len(), 2);
    assert_eq!(program.memory[0], (MemAddr(10), Value::Float(1.5)));
}

#[test]
fn test_simulator_from_file() {
    let file = program_file(PROGRAM);
    let mut sim = Simulator::from_file(Config::default(), file.path()).unwrap();
    let _ = sim.run().unwrap();

    let engine = sim.engine();
    assert_eq!(engine.registers().read(ArchReg::Fp(4)), Value::Float(4.5));
    assert_eq!(engine.registers().read(ArchReg::Fp(6)), Value::Float(5.0));
    assert_eq!(engine.memory().read(MemAddr(14)), Value::Float(5.0));
    assert_eq!(engine.commit_log(), &[0, 1, 2, 3, 4]);
}

#[test]
fn test_unknown_opcode_in_file() {
    let file = program_file("LD F0, 0(R0)\nBNEZ R1, loop\n");
    let err = Simulator::from_file(Config::default(), file.path()).unwrap_err();
    assert!(matches!(err, SimError::UnknownOpcode { line: 2, .. }));
}

#[test]
fn test_missing_program_file() {
    let err = Simulator::from_file(Config::default(), "/nonexistent/prog.s").unwrap_err();
    assert!(matches!(err, SimError::Io { .. }));
}
