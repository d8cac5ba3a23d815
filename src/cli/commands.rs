//! Command implementations.

use std::env;
use std::process::ExitCode;

use anyhow::Result;

use crate::cache::{self, AttemptMarker, CacheStore};
use crate::cli::args::{CacheSubcommand, CheckArgs, Cli, Commands, MarkerSubcommand};
use crate::cli::theme::Theme;
use crate::config::{self, UpdateConfig};
use crate::install::InstallMethod;
use crate::policy::{PolicyChecker, PolicyResult};
use crate::version;

/// Dispatch a parsed command line.
pub fn run(cli: Cli) -> Result<ExitCode> {
    let theme = Theme::auto(cli.no_color);
    match cli.command {
        Commands::Check(args) => check(&args, &theme),
        Commands::Cache { command } => cache_command(&command, &theme),
        Commands::Marker { command } => marker_command(&command, &theme),
    }
}

fn check(args: &CheckArgs, theme: &Theme) -> Result<ExitCode> {
    if self_update_disabled() {
        println!(
            "{}",
            theme
                .dim
                .apply_to("Self-update disabled by TNR_NO_SELFUPDATE=1")
        );
        return Ok(ExitCode::SUCCESS);
    }

    let checker = PolicyChecker::from_env()?;
    let result = checker.check(&args.current, args.force)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(ExitCode::SUCCESS);
    }

    report(&result, theme);
    Ok(ExitCode::SUCCESS)
}

/// Render a check result the way the interactive CLI announces updates.
fn report(result: &PolicyResult, theme: &Theme) {
    let current = version::display(&result.current_version);

    if !result.update_available() {
        println!(
            "{}",
            theme.format_success(&format!("tnr is up to date ({current})"))
        );
        return;
    }

    let latest = version::display(&result.latest_version);
    if result.mandatory {
        let min = version::display(&result.min_version);
        println!(
            "{}",
            theme.format_error(&format!(
                "Mandatory update required: current {current}, minimum {min}."
            ))
        );
    } else {
        println!(
            "{}",
            theme.format_warning(&format!("Update available: {current} → {latest}"))
        );
    }

    let method = InstallMethod::detect();
    if let Some(upgrade) = method.upgrade_command() {
        println!("This installation is managed by {}.", method.name());
        println!("Run: {}", theme.command.apply_to(upgrade));
        return;
    }

    if !result.asset_url.is_empty() {
        println!(
            "{}",
            theme.dim.apply_to(format!("Download: {}", result.asset_url))
        );
    }
    if !result.expected_sha256.is_empty() {
        println!(
            "{}",
            theme
                .dim
                .apply_to(format!("SHA-256: {}", result.expected_sha256))
        );
    }
}

fn cache_command(command: &CacheSubcommand, theme: &Theme) -> Result<ExitCode> {
    let store = resolve_store()?;
    match command {
        CacheSubcommand::Show { json } => {
            let entries = store.entries()?;
            if *json {
                let output = serde_json::json!({
                    "location": store.root(),
                    "entries": entries,
                });
                println!("{}", serde_json::to_string_pretty(&output)?);
                return Ok(ExitCode::SUCCESS);
            }

            if entries.is_empty() {
                println!("Cache is empty");
            } else {
                println!("{} cached entries:", entries.len());
                for name in &entries {
                    println!("  {name}");
                }
            }
            println!(
                "{}",
                theme
                    .dim
                    .apply_to(format!("Location: {}", store.root().display()))
            );
        }
        CacheSubcommand::Clear => {
            let removed = store.clear()?;
            println!(
                "{}",
                theme.format_success(&format!("Cleared {removed} entries"))
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn marker_command(command: &MarkerSubcommand, theme: &Theme) -> Result<ExitCode> {
    match command {
        MarkerSubcommand::Clear => {
            let marker = AttemptMarker::new()?;
            marker.clear()?;
            println!(
                "{}",
                theme.format_success("Cleared the optional-update attempt marker")
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn self_update_disabled() -> bool {
    env::var(config::ENV_NO_SELFUPDATE).as_deref() == Ok("1")
}

fn resolve_store() -> Result<CacheStore> {
    let config = UpdateConfig::from_env();
    let root = match config.cache_dir {
        Some(dir) => dir,
        None => cache::default_cache_dir()?,
    };
    Ok(CacheStore::new(root))
}
