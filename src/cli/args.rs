//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};

/// tnr-update - Update checker for the tnr CLI.
#[derive(Debug, Parser)]
#[command(name = "tnr-update")]
#[command(author, version, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check whether an update is available
    Check(CheckArgs),

    /// Inspect or clear cached release metadata
    Cache {
        #[command(subcommand)]
        command: CacheSubcommand,
    },

    /// Manage the optional-update attempt marker
    Marker {
        #[command(subcommand)]
        command: MarkerSubcommand,
    },
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CheckArgs {
    /// Bypass caches and refetch release metadata
    #[arg(short, long)]
    pub force: bool,

    /// Version to check instead of this binary's own
    #[arg(long, value_name = "VERSION", default_value = env!("CARGO_PKG_VERSION"))]
    pub current: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl Default for CheckArgs {
    fn default() -> Self {
        Self {
            force: false,
            current: env!("CARGO_PKG_VERSION").to_string(),
            json: false,
        }
    }
}

/// Cache subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum CacheSubcommand {
    /// List cached entries
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete every cached entry
    Clear,
}

/// Marker subcommands.
#[derive(Debug, Clone, Subcommand)]
pub enum MarkerSubcommand {
    /// Delete the attempt marker so the next optional update runs
    Clear,
}
