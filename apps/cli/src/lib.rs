//! Operator CLI for Penmark licenses.
//!
//! ```text
//! penmark [--config PATH] [--json] [-v] <verify KEY | activate KEY | status | consume>
//! ```
//!
//! Exit status is `0` on success, `2` when a key is rejected or the license refuses a
//! document, and `1` on any other failure.

pub mod args;
pub mod commands;

use crate::args::{Cli, Command};
use crate::commands::Outcome;
use anyhow::{Context, Result};
use penmark::domain::config::AppConfig;
use penmark::kernel::config::load_config;
use std::io::Write;

/// Loads configuration and runs the parsed command against the configured license store.
///
/// # Errors
/// Returns an error if configuration cannot be loaded, the license store fails, or output
/// cannot be written.
pub fn run(cli: &Cli, config: &AppConfig, out: &mut impl Write) -> Result<Outcome> {
    tracing::debug!(command = ?cli.command, "Running command");
    let open = || penmark::init(config).context("Failed to open the license store");

    match &cli.command {
        Command::Verify { key } => commands::verify(&open()?.licensing, key, cli.json, out),
        Command::Activate { key } => commands::activate(&open()?.licensing, key, cli.json, out),
        Command::Status {} => commands::status(&open()?.licensing, cli.json, out),
        Command::Consume {} => commands::consume(&open()?.licensing, cli.json, out),
        #[cfg(feature = "issuance")]
        Command::Issue { org, days, documents } => {
            commands::issue(org, *days, *documents, cli.json, out)
        },
    }
}

/// Reads the configuration named on the command line, or the default file if any.
///
/// # Errors
/// Returns an error if an explicit file is missing or any layer is malformed.
pub fn load(cli: &Cli) -> Result<AppConfig> {
    load_config::<AppConfig>(cli.config.as_deref()).context("Critical: Configuration is malformed")
}
