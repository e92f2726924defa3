//! Overlay surface port interface

use crate::domain::{BorderColor, NegotiationState, OverlayError};

/// Port for the compositor-facing side of the overlay.
///
/// The Wayland implementation lives in `gui::layer_shell`; tests drive the
/// frame loop through in-memory fakes.
pub trait OverlayBackend {
    /// Current negotiation state of the overlay surface
    fn negotiation(&self) -> NegotiationState;

    /// Block until at least one compositor event has been dispatched
    fn dispatch_blocking(&mut self) -> Result<(), OverlayError>;

    /// Install an empty input region so the overlay never takes input
    fn clear_input_region(&mut self) -> Result<(), OverlayError>;

    /// Allocate the shared pixel buffer for the bordered extent
    fn allocate_buffer(&mut self) -> Result<(), OverlayError>;

    /// Draw the border in `color` and commit it as one visible frame
    fn submit_frame(&mut self, color: BorderColor) -> Result<(), OverlayError>;

    /// Dispatch already-queued compositor events without blocking
    fn dispatch_pending(&mut self) -> Result<(), OverlayError>;

    /// Send buffered requests to the compositor
    fn flush(&mut self) -> Result<(), OverlayError>;
}
