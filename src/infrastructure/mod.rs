//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces that
//! integrate with the filesystem and the process environment.

pub mod stop_marker;

// Re-export adapters
pub use stop_marker::StopMarker;
