//! Main app runner

use std::process::ExitCode;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::application::LoopOutcome;
use crate::domain::error::EXIT_SUCCESS;
use crate::domain::{OverlayConfig, OverlayError};

use super::presenter::Presenter;

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "border_overlay=warn";

/// Initialize logging to stderr, honoring `RUST_LOG`
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Run the overlay until it is stopped or closed
pub fn run_overlay(config: OverlayConfig) -> ExitCode {
    let presenter = Presenter::new();

    info!(
        region = %config.region,
        border = config.border,
        stop_marker = %config.stop_marker.display(),
        "Starting border overlay"
    );

    match run(&config, &presenter) {
        Ok(outcome) => {
            info!(exit = %outcome.exit, frames = outcome.frames, "Overlay finished");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            presenter.error(&e.to_string());
            ExitCode::from(e.exit_code())
        }
    }
}

#[cfg(target_os = "linux")]
fn run(config: &OverlayConfig, presenter: &Presenter) -> Result<LoopOutcome, OverlayError> {
    use crate::application::{AnyOf, CancellationToken, FrameLoop};
    use crate::domain::MonotonicClock;
    use crate::gui::OverlayDriver;
    use crate::infrastructure::StopMarker;

    use super::signals::TerminationSignal;

    let extent = config.extent()?;

    let marker = StopMarker::with_path(&config.stop_marker);
    let token: Box<dyn CancellationToken> = match TerminationSignal::install() {
        Ok(signal) => Box::new(AnyOf(marker, signal)),
        Err(e) => {
            presenter.warn(&format!(
                "Failed to install signal handlers ({}); only the stop marker will end the overlay",
                e
            ));
            Box::new(marker)
        }
    };

    // Dropping the driver releases every protocol object, on success and error alike
    let mut driver = OverlayDriver::connect(extent)?;
    FrameLoop::new(token, MonotonicClock::new(), config.frame_interval).run(&mut driver)
}

#[cfg(not(target_os = "linux"))]
fn run(config: &OverlayConfig, _presenter: &Presenter) -> Result<LoopOutcome, OverlayError> {
    config.extent()?;
    Err(OverlayError::ConnectionFailed(
        "the layer-shell overlay is only supported on Linux".to_string(),
    ))
}
