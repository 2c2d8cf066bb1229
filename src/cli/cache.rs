//! `cache`, `refresh` and `reset` commands.

use serde_json::json;

use crate::cli::args::{CacheCommand, OutputFormat};
use crate::core::sync::ModelSynchronizer;
use crate::error::{ModelSyncError, Result};
use crate::render::{emit, human};

/// Execute a cache subcommand.
///
/// # Errors
///
/// Returns an error if the store cannot be written.
pub fn execute(
    cmd: &CacheCommand,
    sync: &ModelSynchronizer,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<()> {
    match cmd {
        CacheCommand::Status => emit("cache status", sync.cache().status(), format, pretty, |rows| {
            human::render_cache_status(rows, no_color)
        }),

        CacheCommand::Clear { provider } => {
            sync.cache().clear(provider.as_deref())?;
            emit(
                "cache clear",
                json!({ "provider": provider, "cleared": true }),
                format,
                pretty,
                |_| match provider {
                    Some(p) => format!("Cleared cached models for {p}"),
                    None => "Cleared the model cache".to_string(),
                },
            )
        }

        CacheCommand::Init => {
            sync.initialize();
            emit("cache init", sync.cache().status(), format, pretty, |rows| {
                human::render_cache_status(rows, no_color)
            })
        }
    }
}

/// Refresh every stale provider.
///
/// The report is printed first; any per-provider failure then becomes
/// [`ModelSyncError::PartialFailure`].
///
/// # Errors
///
/// Returns an error if one or more providers failed to refresh.
pub async fn refresh(
    sync: &ModelSynchronizer,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<()> {
    sync.initialize();
    let report = sync.refresh_stale().await;
    let failed = report.failed().len();

    emit("refresh", &report, format, pretty, |report| {
        human::render_refresh(report, no_color)
    })?;

    if failed > 0 {
        return Err(ModelSyncError::PartialFailure { failed });
    }
    Ok(())
}

/// Delete every stored key and the whole model cache.
///
/// # Errors
///
/// Returns an error if the store cannot be modified.
pub fn reset(sync: &ModelSynchronizer, format: OutputFormat, pretty: bool) -> Result<()> {
    sync.clear_all_data()?;
    emit("reset", json!({ "reset": true }), format, pretty, |_| {
        "Removed all stored API keys and cached models".to_string()
    })
}
