/// Program runner with log capture.
pub mod harness;

/// Mock implementations of the engine's collaborators.
pub mod mocks;

/// Sequential reference interpreter.
pub mod reference;
