//! Command-line interface for the update checker.
//!
//! - [`args`] - Argument definitions using clap derive macros
//! - [`commands`] - Command implementations
//! - [`theme`] - Terminal styling

pub mod args;
pub mod commands;
pub mod theme;

pub use args::{CacheSubcommand, CheckArgs, Cli, Commands, MarkerSubcommand};
pub use theme::Theme;
