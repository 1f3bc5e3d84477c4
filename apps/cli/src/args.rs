//! # CLI Argument Definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Manage the organization license that gates document signing.
#[derive(Debug, Parser)]
#[command(name = "penmark")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Configuration file (TOML, JSON, YAML). Defaults to `penmark.*` in the working directory.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Decode a license key and report its verdict without activating it
    Verify {
        /// The license key, dashes optional
        key: String,
    },
    /// Activate a license key for this organization
    Activate {
        /// The license key, dashes optional
        key: String,
    },
    /// Show the current license and its usage
    Status {},
    /// Record one signed document against the quota
    Consume {},
    /// Issue a new license key
    #[cfg(feature = "issuance")]
    Issue {
        /// Organization identifier; must not contain ':'
        #[arg(short, long)]
        org: String,

        /// Validity in days from now
        #[arg(short, long, default_value_t = 365)]
        days: u32,

        /// Number of documents the license allows
        #[arg(short = 'n', long)]
        documents: u64,
    },
}
