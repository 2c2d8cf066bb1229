//! CLI argument parsing and command dispatch.

pub mod args;
pub mod cache;
pub mod context;
pub mod keys;
pub mod models;
pub mod providers;

pub use args::{CacheCommand, Cli, Commands, KeysCommand, ModelsArgs, OutputFormat};

use crate::core::sync::ModelSynchronizer;
use crate::error::Result;

/// Run one command against `sync`.
///
/// # Errors
///
/// Propagates the command's error; the caller maps it to an exit code.
pub async fn dispatch(
    command: &Commands,
    sync: &ModelSynchronizer,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<()> {
    match command {
        Commands::Providers => providers::execute(sync, format, pretty, no_color),
        Commands::Keys(cmd) => keys::execute(cmd, sync, format, pretty, no_color).await,
        Commands::Models(args) => models::execute(args, sync, format, pretty, no_color).await,
        Commands::Refresh => cache::refresh(sync, format, pretty, no_color).await,
        Commands::Cache(cmd) => cache::execute(cmd, sync, format, pretty, no_color),
        Commands::Reset => cache::reset(sync, format, pretty),
    }
}
