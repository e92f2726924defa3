//! Domain error types

use thiserror::Error;

use crate::domain::capability::Capability;

/// Exit code for a clean shutdown
pub const EXIT_SUCCESS: u8 = 0;

/// Exit code for every fatal failure
pub const EXIT_ERROR: u8 = 1;

/// Error when parsing a geometry string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid geometry: \"{input}\" ({reason}). Expected format: \"<x>,<y> <width>x<height>\" (e.g., \"100,50 800x600\")")]
pub struct GeometryParseError {
    pub input: String,
    pub reason: &'static str,
}

/// Fatal overlay errors.
///
/// A compositor closing the surface is not represented here: it is a normal
/// termination and surfaces as `LoopExit::CompositorClosed`.
#[derive(Debug, Error)]
pub enum OverlayError {
    #[error(transparent)]
    InvalidGeometry(#[from] GeometryParseError),

    #[error("Failed to connect to Wayland compositor: {0}")]
    ConnectionFailed(String),

    #[error("Compositor does not provide {0}")]
    MissingCapability(Capability),

    #[error("Failed to allocate shared pixel buffer: {0}")]
    AllocationFailed(String),

    #[error("Lost connection to Wayland compositor: {0}")]
    ConnectionLost(String),
}

impl OverlayError {
    /// Process exit code for this error
    pub const fn exit_code(&self) -> u8 {
        EXIT_ERROR
    }
}
