//! Application layer - Use cases and port interfaces
//!
//! Contains the overlay frame loop and trait definitions
//! for compositor and cancellation interactions.

pub mod frame_loop;
pub mod ports;

// Re-export use cases
pub use frame_loop::{await_configured, FrameLoop, LoopExit, LoopOutcome};
pub use ports::{AnyOf, CancellationToken, OverlayBackend};
