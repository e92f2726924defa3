//! Termination signal handling
//!
//! SIGINT and SIGTERM set a process-wide flag that the frame loop polls
//! alongside the stop marker, so a killed overlay still goes through the
//! normal teardown path.

use std::sync::atomic::{AtomicBool, Ordering};

use nix::libc::c_int;
use nix::sys::signal::{sigaction, SaFlags, SigAction, SigHandler, SigSet, Signal};
use tracing::debug;

use crate::application::ports::CancellationToken;

static TERMINATION_REQUESTED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_termination(_signal: c_int) {
    TERMINATION_REQUESTED.store(true, Ordering::SeqCst);
}

/// Cancellation token fed by SIGINT/SIGTERM
#[derive(Debug, Clone, Copy)]
pub struct TerminationSignal {
    _installed: (),
}

impl TerminationSignal {
    /// Signals routed to the flag
    pub const SIGNALS: [Signal; 2] = [Signal::SIGINT, Signal::SIGTERM];

    /// Install the handlers.
    ///
    /// Handlers reset to the default action after the first delivery
    /// (`SA_RESETHAND`): a second signal terminates immediately, which also
    /// covers the blocking startup wait where the flag is not polled.
    pub fn install() -> Result<Self, nix::Error> {
        let action = SigAction::new(
            SigHandler::Handler(on_termination),
            SaFlags::SA_RESETHAND,
            SigSet::empty(),
        );

        for signal in Self::SIGNALS {
            // SAFETY: the handler only stores to an atomic, which is
            // async-signal-safe
            unsafe { sigaction(signal, &action) }?;
            debug!(%signal, "Installed termination handler");
        }

        Ok(Self { _installed: () })
    }
}

impl CancellationToken for TerminationSignal {
    fn is_cancelled(&self) -> bool {
        TERMINATION_REQUESTED.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handler_sets_flag() {
        let token = TerminationSignal::install().unwrap();
        // Invoke the handler directly; raising a real signal would race with
        // other tests in this process
        on_termination(Signal::SIGTERM as c_int);
        assert!(token.is_cancelled());
    }

    #[test]
    fn handles_interrupt_and_terminate() {
        assert!(TerminationSignal::SIGNALS.contains(&Signal::SIGINT));
        assert!(TerminationSignal::SIGNALS.contains(&Signal::SIGTERM));
    }
}
