//! Effective overlay configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::domain::error::GeometryParseError;
use crate::domain::geometry::{BorderedRect, Rectangle};

/// Default border thickness in pixels
pub const DEFAULT_BORDER_WIDTH: u32 = 3;

/// Marker whose existence asks the overlay to exit
pub const DEFAULT_STOP_MARKER: &str = "/tmp/stop-screen-recorder-overlay";

/// Layer-shell namespace identifying the overlay to the compositor
pub const SURFACE_NAMESPACE: &str = "screen-recorder-border";

/// Sleep between frames (about 60 fps)
pub const FRAME_INTERVAL: Duration = Duration::from_micros(16_666);

/// Runtime configuration, assembled once at startup and never persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayConfig {
    pub region: Rectangle,
    pub border: u32,
    pub stop_marker: PathBuf,
    pub frame_interval: Duration,
}

impl OverlayConfig {
    /// Configuration for `region` with every other value at its default
    pub fn new(region: Rectangle) -> Self {
        Self {
            region,
            border: DEFAULT_BORDER_WIDTH,
            stop_marker: PathBuf::from(DEFAULT_STOP_MARKER),
            frame_interval: FRAME_INTERVAL,
        }
    }

    pub fn with_border(mut self, border: u32) -> Self {
        self.border = border;
        self
    }

    pub fn with_stop_marker(mut self, path: impl Into<PathBuf>) -> Self {
        self.stop_marker = path.into();
        self
    }

    /// Surface and buffer extent, or why it cannot be represented
    pub fn extent(&self) -> Result<BorderedRect, GeometryParseError> {
        self.region.bordered(self.border)
    }
}
