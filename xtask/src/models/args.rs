//! # CLI Argument Definitions
//!
//! Subcommands of the workspace developer toolkit.

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "cargo xtask")]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(arg_required_else_help = true)]
#[command(about = "Developer toolkit for the Penmark workspace")]
pub struct Cli {
    #[command(subcommand)]
    pub command: AppCommands,
}

#[derive(Debug, Subcommand)]
pub enum AppCommands {
    /// List workspace crates with their descriptions
    Crates {},
    /// Run tests (workspace by default)
    Test {
        /// Run tests for a specific crate (auto-prefixes with 'penmark-' if missing)
        project: Option<String>,
    },
    /// Run doc tests (workspace by default)
    Doctest {
        /// Run doc tests for a specific crate (auto-prefixes with 'penmark-' if missing)
        project: Option<String>,
    },
    /// Run a project
    Run {
        /// Crate to run (auto-prefixes with 'penmark-' if missing)
        project: String,
        /// Arguments passed through to the binary
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Issue a license key for an organization
    Lic {
        /// Organization identifier embedded in the key (no ':')
        #[arg(short, long)]
        org: String,

        /// Validity in days from now
        #[arg(short, long, default_value_t = 365)]
        days: u32,

        /// Number of documents the key allows to sign
        #[arg(short = 'n', long)]
        documents: u64,
    },
}
