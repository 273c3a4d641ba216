//! Storefront CLI
//!
//! Drives the cart and order ledgers against a JSON document on disk.

use std::process::ExitCode;

use tracing::error;

use crate::config::Config;

mod commands;
mod config;
mod observability;

/// Storefront CLI entry point
fn main() -> ExitCode {
    // Load configuration from .env and CLI arguments
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            // Help and version requests are reported through clap as well.
            _ = err.print();

            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if let Err(err) = observability::init_subscriber(&config.logging) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("Logging error: {err}");
        }

        return ExitCode::FAILURE;
    }

    match commands::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "command failed");

            #[expect(clippy::print_stderr, reason = "user-facing command failure")]
            {
                eprintln!("Error: {err}");
            }

            ExitCode::FAILURE
        }
    }
}
