//! modelsync - AI provider keys and model catalog
//!
//! CLI entry point.

#![forbid(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

use clap::Parser;
use std::process::ExitCode;

use modelsync::cli::args::OutputFormat;
use modelsync::cli::{Cli, context, dispatch};
use modelsync::core::logging::{self, LoggingOptions};
use modelsync::error::ModelSyncError;
use modelsync::render::error::render_error;
use modelsync::storage::{AppPaths, ResolvedConfig};
use modelsync::util::env::{Stream, color_enabled};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let format = cli.effective_format();
    let pretty = cli.pretty;
    let no_color = !color_enabled(Stream::Stdout, cli.no_color);

    let resolved = match ResolvedConfig::resolve(&cli) {
        Ok(resolved) => resolved,
        Err(e) => return fail(&e, format, no_color, pretty),
    };

    // Initialize logging
    let options = LoggingOptions::resolve(
        cli.log_level.as_deref(),
        cli.json_output,
        cli.verbose,
        resolved.config.general.log_level.as_deref(),
        |key| std::env::var(key).ok(),
    );
    logging::init(&options);
    tracing::debug!(
        config_source = %resolved.sources.config_path,
        timeout_source = %resolved.sources.timeout,
        "Resolved configuration"
    );

    let Some(command) = cli.command.as_ref() else {
        print_quickstart();
        return ExitCode::SUCCESS;
    };

    let result = match context::build_synchronizer(&resolved, &AppPaths::new()) {
        Ok(sync) => dispatch(command, &sync, format, pretty, no_color).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e, format, no_color, pretty),
    }
}

fn fail(error: &ModelSyncError, format: OutputFormat, no_color: bool, pretty: bool) -> ExitCode {
    tracing::debug!(code = error.error_code(), "{error}");
    let stderr_no_color = !color_enabled(Stream::Stderr, no_color);
    eprintln!("{}", render_error(error, format, stderr_no_color, pretty));
    ExitCode::from(error.exit_code() as u8)
}

/// Print quickstart help when no command is given.
fn print_quickstart() {
    println!(
        r"modelsync - AI provider keys and model catalog

Stores API keys for AI providers and keeps a 24-hour cache of their models.

USAGE:
    modelsync [OPTIONS] <COMMAND>

COMMANDS:
    providers   List providers and key status
    keys        Add, list, remove and verify API keys
    models      Browse models (filter, sort, page)
    refresh     Refresh every stale provider
    cache       Cache status, clear, init
    reset       Delete all keys and cached models

QUICK START:
    modelsync keys add openai sk-...          # Store and verify a key
    modelsync models --provider openai        # Models for one provider
    modelsync models --capability vision      # Filter the whole catalog
    modelsync refresh                         # Refresh stale providers

ROBOT MODE (for AI agents):
    modelsync models --json                   # JSON output

For more help: modelsync --help
"
    );
    println!("Version: {}", env!("CARGO_PKG_VERSION"));
}
