//! `providers` command.

use crate::cli::args::OutputFormat;
use crate::core::models::ProviderSummary;
use crate::core::sync::ModelSynchronizer;
use crate::error::Result;
use crate::render::{emit, human};

/// Registry entries joined with their stored-key state, in registry order.
#[must_use]
pub fn summarize(sync: &ModelSynchronizer) -> Vec<ProviderSummary> {
    let keys = sync.credentials().list_all();
    sync.registry()
        .all()
        .iter()
        .map(|provider| {
            let entry = keys.get(&provider.id);
            ProviderSummary {
                id: provider.id.clone(),
                name: provider.name.clone(),
                description: provider.description.clone(),
                requires_api_key: provider.requires_api_key,
                has_key: entry.is_some(),
                key_verified: entry.is_some_and(|e| e.is_verified),
                custom: provider.custom,
                docs_url: provider.docs_url.clone(),
            }
        })
        .collect()
}

/// Execute the providers command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(
    sync: &ModelSynchronizer,
    format: OutputFormat,
    pretty: bool,
    no_color: bool,
) -> Result<()> {
    emit("providers", summarize(sync), format, pretty, |rows| {
        human::render_providers(rows, no_color)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SyncFixture;

    #[test]
    fn summary_reflects_stored_keys() {
        let fixture = SyncFixture::unreachable();
        fixture.sync.save_credential("openai", "sk-test-123").unwrap();

        let rows = summarize(&fixture.sync);
        assert_eq!(rows.len(), fixture.sync.registry().all().len());

        let openai = rows.iter().find(|r| r.id == "openai").unwrap();
        assert!(openai.has_key);
        assert!(!openai.key_verified);

        let groq = rows.iter().find(|r| r.id == "groq").unwrap();
        assert!(!groq.has_key);
    }
}
