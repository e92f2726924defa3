//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod cancellation;
pub mod overlay;

// Re-export common types
pub use cancellation::{AnyOf, CancellationToken};
pub use overlay::OverlayBackend;
