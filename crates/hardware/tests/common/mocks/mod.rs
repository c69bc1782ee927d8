/// Mock data memory.
pub mod memory;
