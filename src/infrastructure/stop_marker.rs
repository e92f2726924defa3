//! Filesystem stop marker
//!
//! The recorder's control panel creates the marker when the user saves or
//! cancels. Only its existence matters; the content is never read.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::application::ports::CancellationToken;
use crate::domain::config::DEFAULT_STOP_MARKER;

/// Cancellation token that fires once a well-known path exists
#[derive(Debug, Clone)]
pub struct StopMarker {
    path: PathBuf,
}

impl StopMarker {
    /// Create a stop marker watcher with the default path
    pub fn new() -> Self {
        Self::with_path(DEFAULT_STOP_MARKER)
    }

    /// Create with custom path
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Get the marker path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for StopMarker {
    fn default() -> Self {
        Self::new()
    }
}

impl CancellationToken for StopMarker {
    fn is_cancelled(&self) -> bool {
        // symlink_metadata: a dangling symlink still counts as present
        let present = self.path.symlink_metadata().is_ok();
        if present {
            debug!(path = %self.path.display(), "Stop marker present");
        }
        present
    }
}
