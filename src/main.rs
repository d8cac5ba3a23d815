//! tnr-update CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tnr_update::cli::{commands, Cli, Theme};
use tnr_update::config;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize the tracing subscriber for logging.
///
/// Log level is controlled by:
/// 1. `--debug` flag (or `TNR_UPDATE_DEBUG=1`) sets level to DEBUG
/// 2. `RUST_LOG` environment variable (if set)
/// 3. Default is INFO
///
/// Logs go to stderr so `--json` output stays parseable.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("tnr_update=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tnr_update=info"))
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let debug = cli.debug || std::env::var(config::ENV_UPDATE_DEBUG).as_deref() == Ok("1");
    init_tracing(debug);

    tracing::debug!("tnr-update starting with args: {:?}", cli);

    // Handle --no-color
    if cli.no_color {
        std::env::set_var("NO_COLOR", "1");
    }

    let theme = Theme::auto(cli.no_color);
    match commands::run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", theme.format_error(&format!("Error: {}", e)));
            ExitCode::FAILURE
        }
    }
}
