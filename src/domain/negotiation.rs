//! Overlay surface negotiation state machine

use std::fmt;

/// Negotiation states
///
/// State machine:
///   CREATED -> AWAITING_CONFIGURE (request)
///   AWAITING_CONFIGURE -> CONFIGURED (configure)
///   CONFIGURED -> CONFIGURED (configure, newer serial)
///   any -> CLOSED (closed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NegotiationState {
    #[default]
    Created,
    AwaitingConfigure,
    /// Holds the last acknowledged configure serial
    Configured { serial: u32 },
    Closed,
}

impl NegotiationState {
    /// Get the string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::AwaitingConfigure => "awaiting-configure",
            Self::Configured { .. } => "configured",
            Self::Closed => "closed",
        }
    }

    /// The surface has been acknowledged at least once and is still open
    pub const fn is_configured(&self) -> bool {
        matches!(self, Self::Configured { .. })
    }

    /// The compositor has not closed the surface
    pub const fn is_running(&self) -> bool {
        !matches!(self, Self::Closed)
    }

    /// The startup wait is over, one way or the other
    pub const fn is_settled(&self) -> bool {
        matches!(self, Self::Configured { .. } | Self::Closed)
    }

    /// Layer surface requested and committed
    pub fn request(&mut self) -> bool {
        if *self != Self::Created {
            return false;
        }
        *self = Self::AwaitingConfigure;
        true
    }

    /// A configure carrying `serial` arrived and was acknowledged.
    ///
    /// Returns `false` when the event is ignored: before the surface was
    /// requested, or after it was closed.
    pub fn configure(&mut self, serial: u32) -> bool {
        match self {
            Self::AwaitingConfigure | Self::Configured { .. } => {
                *self = Self::Configured { serial };
                true
            }
            Self::Created | Self::Closed => false,
        }
    }

    /// The compositor closed the surface. Terminal.
    pub fn close(&mut self) {
        *self = Self::Closed;
    }
}

impl fmt::Display for NegotiationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
