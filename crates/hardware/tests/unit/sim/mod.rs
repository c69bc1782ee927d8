/// Configuration files.
pub mod config;

/// Program files on disk.
pub mod loader;

/// Report rendering.
pub mod report;
