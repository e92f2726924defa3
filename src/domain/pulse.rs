//! Time-driven pulse and the border color derived from it

use std::f64::consts::TAU;
use std::time::Instant;

/// Angular speed of the pulse in radians per second
pub const PULSE_RATE: f64 = 1.5;

/// Pulse period in seconds (2π / 1.5, about 4.19)
pub const PULSE_PERIOD: f64 = TAU / PULSE_RATE;

/// Monotonic seconds source sampled once per frame
pub trait AnimationClock {
    fn seconds(&self) -> f64;
}

/// Clock backed by `Instant`, counting from creation
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationClock for MonotonicClock {
    fn seconds(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Smooth wave in [0, 1]
pub fn pulse(t: f64) -> f64 {
    ((t * PULSE_RATE).sin() + 1.0) / 2.0
}

/// Base border color for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderColor {
    pub alpha: u8,
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl BorderColor {
    /// Deep red at p = 0, bright red-orange at p = 1.
    /// Out-of-range input is clamped into [0, 1].
    pub fn from_pulse(p: f64) -> Self {
        let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
        Self {
            alpha: 200 + (p * 55.0).round() as u8,
            red: 180 + (p * 75.0).round() as u8,
            green: (p * 40.0).round() as u8,
            blue: 0,
        }
    }

    /// ARGB8888: alpha in the high byte
    pub const fn pack(&self) -> u32 {
        (self.alpha as u32) << 24
            | (self.red as u32) << 16
            | (self.green as u32) << 8
            | self.blue as u32
    }

    /// Same color with a different alpha
    pub const fn with_alpha(&self, alpha: u8) -> Self {
        Self {
            alpha,
            red: self.red,
            green: self.green,
            blue: self.blue,
        }
    }
}
