/// Issue stalls on full structures.
pub mod capacity;


/// Loads and stores against a mocked memory.
pub mod memory_seam;

/// Random-program properties against the sequential interpreter.
pub mod properties;

/// Hand-timed scenarios.
pub mod scenarios;
