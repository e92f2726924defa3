//! Border Overlay - animated highlight around a screen recording region
//!
//! This crate draws a pulsing, click-through border around a rectangular
//! screen region using the Wayland layer-shell protocol, and exits when an
//! external stop marker appears.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Geometry, pulse and border math, negotiation state, errors
//! - **Application**: The frame loop and port interfaces (traits)
//! - **Infrastructure**: Adapter implementations (filesystem stop marker)
//! - **CLI**: Command-line interface, argument parsing, and signal handling
//! - **GUI**: Compositor session, shared pixel buffer and layer surface
//!   (Linux only, uses Wayland layer-shell)

pub mod application;
pub mod cli;
pub mod domain;
#[cfg(target_os = "linux")]
pub mod gui;
pub mod infrastructure;
