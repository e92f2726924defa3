//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::Parser;

use crate::domain::config::{OverlayConfig, DEFAULT_BORDER_WIDTH, DEFAULT_STOP_MARKER};
use crate::domain::Rectangle;

/// Border Overlay - animated highlight around a screen recording region
#[derive(Parser, Debug)]
#[command(name = "border-overlay")]
#[command(version)]
#[command(about = "Draws a pulsing click-through border around a screen region on Wayland")]
#[command(long_about = None)]
pub struct Cli {
    /// Region to highlight: "<x>,<y> <width>x<height>" (e.g., "100,50 800x600")
    #[arg(value_name = "GEOMETRY", allow_hyphen_values = true)]
    pub geometry: Rectangle,

    /// Border thickness in pixels
    #[arg(
        short = 'b',
        long,
        value_name = "PX",
        env = "BORDER_OVERLAY_WIDTH",
        default_value_t = DEFAULT_BORDER_WIDTH
    )]
    pub border: u32,

    /// File whose existence stops the overlay
    #[arg(
        long,
        value_name = "PATH",
        env = "BORDER_OVERLAY_STOP_MARKER",
        default_value = DEFAULT_STOP_MARKER
    )]
    pub stop_marker: PathBuf,
}

impl Cli {
    /// Effective runtime configuration
    pub fn into_config(self) -> OverlayConfig {
        OverlayConfig::new(self.geometry)
            .with_border(self.border)
            .with_stop_marker(self.stop_marker)
    }
}
