//! GUI module for the border overlay (Linux only)
//!
//! Uses Wayland layer-shell for proper overlay behavior on Linux.

pub mod layer_shell;
pub mod session;
pub mod shm;

pub use layer_shell::OverlayDriver;
