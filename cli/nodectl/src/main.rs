//! `nodectl`: command-line front end for a Lightning node's HTTP control API.
//!
//! Results go to stdout (text on a terminal, JSON otherwise); errors and
//! logs go to stderr. Set `NODEWIRE_LOG=debug` to see each request.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

use std::process::ExitCode;

use clap::Parser;

mod cli;
mod commands;
mod error;
mod output;
mod spinner;

use crate::cli::Cli;

/// Main entry point for nodectl.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    nodewire_logging::init(nodewire_logging::verbosity(cli.verbose));

    match commands::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
