//! CLI presenter for diagnostics on stderr

use colored::*;

/// Presenter for CLI output formatting
pub struct Presenter;

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", "⚠".yellow(), message);
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Print the usage hint after an argument error
    pub fn usage(&self) {
        eprintln!(
            "{} border-overlay \"<x>,<y> <width>x<height>\"",
            "Usage:".bold()
        );
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
