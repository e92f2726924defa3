//! Overlay frame loop use case

use std::fmt;
use std::time::Duration;

use tracing::{debug, info};

use crate::domain::pulse::{pulse, AnimationClock, BorderColor};
use crate::domain::{NegotiationState, OverlayError};

use super::ports::{CancellationToken, OverlayBackend};

/// Why the overlay stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// The cancellation token fired (stop marker or termination signal)
    StopRequested,
    /// The compositor closed the layer surface
    CompositorClosed,
    /// The compositor ended the session after the surface was configured
    ProtocolClosed,
}

impl fmt::Display for LoopExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StopRequested => write!(f, "stop requested"),
            Self::CompositorClosed => write!(f, "compositor closed the surface"),
            Self::ProtocolClosed => write!(f, "compositor ended the session"),
        }
    }
}

/// Result of a completed overlay run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopOutcome {
    pub exit: LoopExit,
    /// Frames committed to the surface
    pub frames: u64,
}

/// Drives an overlay from configure handshake to shutdown
pub struct FrameLoop<T, C>
where
    T: CancellationToken,
    C: AnimationClock,
{
    token: T,
    clock: C,
    interval: Duration,
}

impl<T, C> FrameLoop<T, C>
where
    T: CancellationToken,
    C: AnimationClock,
{
    /// Create a new frame loop
    pub fn new(token: T, clock: C, interval: Duration) -> Self {
        Self {
            token,
            clock,
            interval,
        }
    }

    /// Wait for the first configure, make the surface click-through, then
    /// animate until cancelled or closed.
    ///
    /// Losing the connection before the first configure is fatal; once
    /// frames are flowing it ends the run like a close.
    pub fn run<B: OverlayBackend>(&self, backend: &mut B) -> Result<LoopOutcome, OverlayError> {
        if await_configured(backend)? == NegotiationState::Closed {
            info!("Surface closed before first configure");
            return Ok(LoopOutcome {
                exit: LoopExit::CompositorClosed,
                frames: 0,
            });
        }

        backend.clear_input_region()?;
        backend.allocate_buffer()?;

        let mut frames = 0;
        while backend.negotiation().is_running() {
            if self.token.is_cancelled() {
                info!(frames, "Stop requested");
                return Ok(LoopOutcome {
                    exit: LoopExit::StopRequested,
                    frames,
                });
            }

            let color = BorderColor::from_pulse(pulse(self.clock.seconds()));
            backend.submit_frame(color)?;
            frames += 1;

            match backend.dispatch_pending().and_then(|_| backend.flush()) {
                Ok(()) => {}
                Err(OverlayError::ConnectionLost(reason)) => {
                    info!(frames, %reason, "Compositor ended the session");
                    return Ok(LoopOutcome {
                        exit: LoopExit::ProtocolClosed,
                        frames,
                    });
                }
                Err(e) => return Err(e),
            }

            std::thread::sleep(self.interval);
        }

        info!(frames, "Compositor closed the surface");
        Ok(LoopOutcome {
            exit: LoopExit::CompositorClosed,
            frames,
        })
    }
}

/// Block on compositor events until the surface is configured or closed.
///
/// There is no timeout: a compositor that never configures keeps the overlay
/// waiting here without drawing anything.
pub fn await_configured<B: OverlayBackend>(
    backend: &mut B,
) -> Result<NegotiationState, OverlayError> {
    loop {
        let state = backend.negotiation();
        if state.is_settled() {
            debug!(%state, "Startup negotiation settled");
            return Ok(state);
        }
        backend.dispatch_blocking()?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Scripted backend: a list of negotiation states reached on successive
    /// blocking dispatches, and an optional close after N frames.
    #[derive(Default)]
    struct FakeBackend {
        state: NegotiationState,
        configure_on_dispatch: Option<usize>,
        max_blocking_dispatches: usize,
        close_after_frames: Option<u64>,
        hangup_after_frames: Option<u64>,
        flush_fails_after_frames: Option<u64>,
        blocking_dispatches: usize,
        pending_dispatches: usize,
        flushes: usize,
        input_region_cleared: bool,
        buffer_allocated: bool,
        frames: Vec<BorderColor>,
    }

    impl FakeBackend {
        fn configured_after(dispatches: usize) -> Self {
            Self {
                state: NegotiationState::AwaitingConfigure,
                configure_on_dispatch: Some(dispatches),
                max_blocking_dispatches: 100,
                ..Self::default()
            }
        }

        fn withholding_configure(dispatches: usize) -> Self {
            Self {
                state: NegotiationState::AwaitingConfigure,
                configure_on_dispatch: None,
                max_blocking_dispatches: dispatches,
                ..Self::default()
            }
        }
    }

    impl OverlayBackend for FakeBackend {
        fn negotiation(&self) -> NegotiationState {
            self.state
        }

        fn dispatch_blocking(&mut self) -> Result<(), OverlayError> {
            self.blocking_dispatches += 1;
            if self.blocking_dispatches > self.max_blocking_dispatches {
                return Err(OverlayError::ConnectionLost("simulated hangup".into()));
            }
            if self.configure_on_dispatch == Some(self.blocking_dispatches) {
                self.state.configure(self.blocking_dispatches as u32);
            }
            Ok(())
        }

        fn clear_input_region(&mut self) -> Result<(), OverlayError> {
            assert!(self.state.is_configured());
            self.input_region_cleared = true;
            Ok(())
        }

        fn allocate_buffer(&mut self) -> Result<(), OverlayError> {
            self.buffer_allocated = true;
            Ok(())
        }

        fn submit_frame(&mut self, color: BorderColor) -> Result<(), OverlayError> {
            assert!(self.input_region_cleared && self.buffer_allocated);
            self.frames.push(color);
            Ok(())
        }

        fn dispatch_pending(&mut self) -> Result<(), OverlayError> {
            self.pending_dispatches += 1;
            if self.hangup_after_frames == Some(self.frames.len() as u64) {
                return Err(OverlayError::ConnectionLost("Broken pipe".into()));
            }
            if self.close_after_frames == Some(self.frames.len() as u64) {
                self.state.close();
            }
            Ok(())
        }

        fn flush(&mut self) -> Result<(), OverlayError> {
            self.flushes += 1;
            if self.flush_fails_after_frames == Some(self.frames.len() as u64) {
                return Err(OverlayError::ConnectionLost("Connection reset by peer".into()));
            }
            Ok(())
        }
    }

    /// Cancelled once polled `after` times
    struct CountdownToken {
        polls: Cell<usize>,
        after: usize,
    }

    impl CountdownToken {
        fn new(after: usize) -> Self {
            Self {
                polls: Cell::new(0),
                after,
            }
        }
    }

    impl CancellationToken for CountdownToken {
        fn is_cancelled(&self) -> bool {
            let polls = self.polls.get();
            self.polls.set(polls + 1);
            polls >= self.after
        }
    }

    struct Never;

    impl CancellationToken for Never {
        fn is_cancelled(&self) -> bool {
            false
        }
    }

    struct FixedClock(f64);

    impl AnimationClock for FixedClock {
        fn seconds(&self) -> f64 {
            self.0
        }
    }

    fn frame_loop<T: CancellationToken>(token: T) -> FrameLoop<T, FixedClock> {
        FrameLoop::new(token, FixedClock(0.0), Duration::ZERO)
    }

    #[test]
    fn stop_marker_before_first_frame_submits_nothing() {
        let mut backend = FakeBackend::configured_after(1);
        let outcome = frame_loop(CountdownToken::new(0)).run(&mut backend).unwrap();

        assert_eq!(outcome.exit, LoopExit::StopRequested);
        assert_eq!(outcome.frames, 0);
        assert!(backend.frames.is_empty());
    }

    #[test]
    fn stop_is_observed_on_next_poll() {
        let mut backend = FakeBackend::configured_after(3);
        let outcome = frame_loop(CountdownToken::new(5)).run(&mut backend).unwrap();

        assert_eq!(outcome, LoopOutcome { exit: LoopExit::StopRequested, frames: 5 });
        assert_eq!(backend.frames.len(), 5);
        assert_eq!(backend.pending_dispatches, 5);
        assert_eq!(backend.flushes, 5);
        assert_eq!(backend.blocking_dispatches, 3);
    }

    #[test]
    fn compositor_close_ends_loop() {
        let mut backend = FakeBackend {
            close_after_frames: Some(2),
            ..FakeBackend::configured_after(1)
        };
        let outcome = frame_loop(Never).run(&mut backend).unwrap();

        assert_eq!(outcome, LoopOutcome { exit: LoopExit::CompositorClosed, frames: 2 });
    }

    #[test]
    fn hangup_while_animating_is_clean_exit() {
        let mut backend = FakeBackend {
            hangup_after_frames: Some(3),
            ..FakeBackend::configured_after(1)
        };
        let outcome = frame_loop(Never).run(&mut backend).unwrap();

        assert_eq!(outcome, LoopOutcome { exit: LoopExit::ProtocolClosed, frames: 3 });
        // The failed dispatch is not followed by a flush
        assert_eq!(backend.pending_dispatches, 3);
        assert_eq!(backend.flushes, 2);
    }

    #[test]
    fn failed_flush_while_animating_is_clean_exit() {
        let mut backend = FakeBackend {
            flush_fails_after_frames: Some(1),
            ..FakeBackend::configured_after(2)
        };
        let outcome = frame_loop(Never).run(&mut backend).unwrap();

        assert_eq!(outcome, LoopOutcome { exit: LoopExit::ProtocolClosed, frames: 1 });
    }

    #[test]
    fn frame_errors_stay_fatal() {
        struct Unready(FakeBackend);

        impl OverlayBackend for Unready {
            fn negotiation(&self) -> NegotiationState {
                self.0.negotiation()
            }
            fn dispatch_blocking(&mut self) -> Result<(), OverlayError> {
                self.0.dispatch_blocking()
            }
            fn clear_input_region(&mut self) -> Result<(), OverlayError> {
                self.0.clear_input_region()
            }
            fn allocate_buffer(&mut self) -> Result<(), OverlayError> {
                Ok(())
            }
            fn submit_frame(&mut self, _color: BorderColor) -> Result<(), OverlayError> {
                Err(OverlayError::AllocationFailed("no pixel buffer".into()))
            }
            fn dispatch_pending(&mut self) -> Result<(), OverlayError> {
                self.0.dispatch_pending()
            }
            fn flush(&mut self) -> Result<(), OverlayError> {
                self.0.flush()
            }
        }

        let mut backend = Unready(FakeBackend::configured_after(1));
        let err = frame_loop(Never).run(&mut backend).unwrap_err();

        assert!(matches!(err, OverlayError::AllocationFailed(_)));
        assert_eq!(backend.0.pending_dispatches, 0);
    }

    #[test]
    fn close_before_configure_is_clean_exit_without_frames() {
        let mut backend = FakeBackend {
            state: NegotiationState::Closed,
            ..FakeBackend::default()
        };
        let outcome = frame_loop(Never).run(&mut backend).unwrap();

        assert_eq!(outcome.exit, LoopExit::CompositorClosed);
        assert_eq!(outcome.frames, 0);
        assert!(!backend.input_region_cleared);
        assert!(!backend.buffer_allocated);
    }

    #[test]
    fn withheld_configure_keeps_waiting_without_frames() {
        let mut backend = FakeBackend::withholding_configure(50);
        let err = frame_loop(Never).run(&mut backend).unwrap_err();

        // Every dispatch was spent waiting; the simulated hangup is the only way out
        assert!(matches!(err, OverlayError::ConnectionLost(_)));
        assert_eq!(backend.blocking_dispatches, 51);
        assert!(backend.frames.is_empty());
        assert!(!backend.input_region_cleared);
    }

    #[test]
    fn frame_color_follows_clock() {
        let mut backend = FakeBackend::configured_after(1);
        let quarter = crate::domain::pulse::PULSE_PERIOD / 4.0;
        FrameLoop::new(CountdownToken::new(1), FixedClock(quarter), Duration::ZERO)
            .run(&mut backend)
            .unwrap();

        assert_eq!(backend.frames, vec![BorderColor::from_pulse(1.0)]);
    }

    #[test]
    fn await_configured_returns_immediately_when_settled() {
        let mut backend = FakeBackend {
            state: NegotiationState::Configured { serial: 4 },
            ..FakeBackend::default()
        };
        assert_eq!(
            await_configured(&mut backend).unwrap(),
            NegotiationState::Configured { serial: 4 }
        );
        assert_eq!(backend.blocking_dispatches, 0);
    }

    #[test]
    fn stop_marker_created_mid_run_ends_within_one_interval() {
        use crate::infrastructure::StopMarker;
        use std::time::Instant;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stop");
        let interval = Duration::from_millis(40);

        let creator = {
            let path = path.clone();
            std::thread::spawn(move || {
                std::thread::sleep(Duration::from_millis(150));
                std::fs::write(&path, b"").unwrap();
                Instant::now()
            })
        };

        let mut backend = FakeBackend::configured_after(1);
        let outcome = FrameLoop::new(StopMarker::with_path(&path), FixedClock(0.0), interval)
            .run(&mut backend)
            .unwrap();
        let stopped = Instant::now();
        let created = creator.join().unwrap();

        assert_eq!(outcome.exit, LoopExit::StopRequested);
        assert!(outcome.frames >= 1);
        // One interval of sleep plus scheduling slack
        assert!(
            stopped.duration_since(created) < interval + Duration::from_millis(60),
            "stopped {:?} after the marker appeared",
            stopped.duration_since(created)
        );
    }

    #[test]
    fn exit_display() {
        assert_eq!(LoopExit::StopRequested.to_string(), "stop requested");
        assert_eq!(LoopExit::ProtocolClosed.to_string(), "compositor ended the session");
    }
}
