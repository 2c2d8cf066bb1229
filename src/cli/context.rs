//! Wiring from resolved configuration to a ready [`ModelSynchronizer`].

use std::sync::Arc;

use crate::core::clock::Clock;
use crate::core::provider::ProviderRegistry;
use crate::core::sync::ModelSynchronizer;
use crate::error::Result;
use crate::providers::ProviderClient;
use crate::storage::{
    AppPaths, CredentialStore, FileStore, KeyValueStore, ModelCache, ResolvedConfig,
};

/// Build the synchronizer over the on-disk store at `paths`.
///
/// # Errors
///
/// Returns an error if a custom provider in the config is invalid or the HTTP
/// client cannot be built.
pub fn build_synchronizer(resolved: &ResolvedConfig, paths: &AppPaths) -> Result<ModelSynchronizer> {
    let registry = ProviderRegistry::with_config(&resolved.config)?;
    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(paths.store_dir()));
    let credentials = CredentialStore::new(store.clone(), Clock::System);
    let cache = ModelCache::new(store, Clock::System);
    let client = ProviderClient::new(resolved.timeout)?;

    tracing::debug!(
        store = %paths.store_dir().display(),
        config = %resolved.config_path.display(),
        timeout_secs = resolved.timeout.as_secs(),
        providers = registry.all().len(),
        "Built synchronizer"
    );

    Ok(ModelSynchronizer::new(
        registry,
        credentials,
        cache,
        client,
        Clock::System,
    ))
}
