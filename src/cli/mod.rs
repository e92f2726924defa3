//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, signal handling,
//! and the main application runner.

pub mod app;
pub mod args;
pub mod presenter;
#[cfg(unix)]
pub mod signals;

// Re-export commonly used types
pub use app::{init_logging, run_overlay};
pub use args::Cli;
pub use presenter::Presenter;
