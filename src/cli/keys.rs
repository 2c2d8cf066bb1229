//! `keys` command: add, list, remove and verify provider API keys.

use serde_json::json;

use crate::cli::args::{KeysCommand, OutputFormat};
use crate::core::models::KeySummary;
use crate::core::sync::{ModelSynchronizer, VerificationReport};
use crate::error::{ModelSyncError, Result};
use crate::render::{emit, human};
use crate::storage::credentials::reveal;
use crate::util::mask_key;

/// Stored keys with the secret masked, in provider order.
#[must_use]
pub fn summarize(sync: &ModelSynchronizer) -> Vec<KeySummary> {
    sync.credentials()
        .list_all()
        .into_values()
        .map(|entry| KeySummary {
            masked_key: mask_key(&reveal(&entry.api_key).unwrap_or_default()),
            provider: entry.provider,
            added_at: entry.added_at,
            is_verified: entry.is_verified,
            last_verified: entry.last_verified,
        })
        .collect()
}

/// Execute a keys subcommand.
///
/// # Errors
///
/// Unknown provider, a rejected key ([`ModelSyncError::VerificationFailed`]),
/// `verify` with no stored key, or a storage failure.
pub async fn execute(
    cmd: &KeysCommand,
    sync: &ModelSynchronizer,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<()> {
    match cmd {
        KeysCommand::Add {
            provider,
            key,
            no_verify: true,
        } => {
            sync.save_credential(provider, key)?;
            emit(
                "keys add",
                json!({ "provider": provider, "saved": true, "verified": false }),
                format,
                pretty,
                |_| format!("Saved API key for {provider} (not verified)"),
            )
        }

        KeysCommand::Add { provider, key, .. } => {
            let report = sync.verify_credential(provider, key).await?;
            report_verification("keys add", report, format, pretty, no_color)
        }

        KeysCommand::List => emit("keys list", summarize(sync), format, pretty, |rows| {
            human::render_keys(rows, chrono::Utc::now(), no_color)
        }),

        KeysCommand::Remove { provider } => {
            sync.registry().require(provider)?;
            let had_key = sync.credentials().has(provider);
            sync.remove_credential(provider)?;
            emit(
                "keys remove",
                json!({ "provider": provider, "removed": had_key }),
                format,
                pretty,
                |_| {
                    if had_key {
                        format!("Removed API key and cached models for {provider}")
                    } else {
                        format!("No API key stored for {provider}")
                    }
                },
            )
        }

        KeysCommand::Verify { provider } => {
            sync.registry().require(provider)?;
            let key = sync.credentials().get(provider);
            if key.is_empty() {
                return Err(ModelSyncError::MissingCredential {
                    provider: provider.clone(),
                });
            }
            let report = sync.verify_credential(provider, &key).await?;
            report_verification("keys verify", report, format, pretty, no_color)
        }
    }
}

/// Print the report, then fail with an auth error if the key was rejected.
fn report_verification(
    command: &str,
    report: VerificationReport,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<()> {
    let failure = (!report.verified).then(|| ModelSyncError::VerificationFailed {
        provider: report.provider.clone(),
        reason: report.message.clone(),
    });
    emit(command, report, format, pretty, |r| {
        human::render_verification(r, no_color)
    })?;
    failure.map_or(Ok(()), Err)
}
