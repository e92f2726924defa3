//! Border Overlay CLI entry point

use std::process::ExitCode;

use clap::Parser;

use border_overlay::cli::{init_logging, run_overlay, Cli, Presenter};
use border_overlay::domain::error::{EXIT_ERROR, EXIT_SUCCESS};

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not errors
            if !e.use_stderr() {
                return ExitCode::from(EXIT_SUCCESS);
            }
            Presenter::new().usage();
            return ExitCode::from(EXIT_ERROR);
        }
    };

    init_logging();
    run_overlay(cli.into_config())
}
