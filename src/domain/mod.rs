//! Domain layer - Core overlay logic
//!
//! Contains geometry, color and border math, the surface negotiation state
//! machine and domain errors. This layer has no dependencies on the
//! compositor or the filesystem.

pub mod border;
pub mod capability;
pub mod config;
pub mod error;
pub mod geometry;
pub mod negotiation;
pub mod pulse;

// Re-export common types
pub use border::{draw_border, PixelCanvas};
pub use capability::Capability;
pub use config::OverlayConfig;
pub use error::*;
pub use geometry::{BorderedRect, Rectangle};
pub use negotiation::NegotiationState;
pub use pulse::{AnimationClock, BorderColor, MonotonicClock};
