use tomasim_core::common::{MemAddr, Value};
use tomasim_core::core::arch::{ArchRegisterFile, Memory, MemoryStore, RegisterStore};
use tomasim_core::core::units::compute;
use tomasim_core::isa::{Instruction, Sources};
use tomasim_core::sim::Program;

/// Executes `program` one instruction at a time, in order, with no timing.
pub fn interpret(program: &Program, offset_scale: i64) -> (ArchRegisterFile, Memory) {
    let mut regs = ArchRegisterFile::new();
    for &(reg, value) in &program.registers {
        regs.write(reg, value);
    }
    let mut mem = Memory::new();
    for &(addr, value) in &program.memory {
        mem.write(addr, value);
    }
    for inst in &program.instructions {
        step(inst, &mut regs, &mut mem, offset_scale);
    }
    (regs, mem)
}

fn step(inst: &Instruction, regs: &mut ArchRegisterFile, mem: &mut Memory, offset_scale: i64) {
    match inst.sources {
        Sources::Registers(rs, rt) => {
            let value = compute(inst.opcode, regs.read(rs), regs.read(rt)).unwrap();
            regs.write(inst.dest.unwrap(), value);
        }
        Sources::Immediate(rs, imm) => {
            let value = compute(inst.opcode, regs.read(rs), Value::Int(imm)).unwrap();
            regs.write(inst.dest.unwrap(), value);
        }
        Sources::Memory { offset, base, data } => {
            let addr = MemAddr::effective(offset, offset_scale, regs.read(base).as_i64());
            match data {
                Some(rs) => mem.write(addr, regs.read(rs)),
                None => regs.write(inst.dest.unwrap(), mem.read(addr)),
            }
        }
    }
}

/// Value equality that treats two NaNs with the same bits as equal.
pub fn same(a: Value, b: Value) -> bool {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) => x.to_bits() == y.to_bits(),
        _ => a == b,
    }
}
