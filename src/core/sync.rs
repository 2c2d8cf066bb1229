//! Model synchronizer.
//!
//! Reconciles the model cache with live provider data and is the single read
//! API for model lists. Per provider the cache moves
//! `NoData -> Fresh -> Stale -> Fresh | Stale-with-fallback`; nothing here
//! runs on a timer, callers decide when to refresh.

use std::time::Instant;

use futures::future::join_all;
use serde::Serialize;

use super::clock::Clock;
use super::enrich::{enrich, to_model};
use super::models::Model;
use super::provider::{ProviderConfig, ProviderRegistry};
use crate::error::{ModelSyncError, Result};
use crate::providers::ProviderClient;
use crate::storage::{CredentialStore, ModelCache};

// =============================================================================
// Reports
// =============================================================================

/// Outcome of verifying one API key. Never an error for a bad key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationReport {
    pub provider: String,
    pub verified: bool,
    /// HTTP status, when a response was received.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    pub message: String,
}

/// What `refresh_stale` did for one provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum RefreshOutcome {
    /// Fetched and cached `count` models.
    Refreshed { count: usize },
    /// Cache entry was still fresh.
    UpToDate,
    /// Provider requires a key and none is stored.
    SkippedNoCredential,
    /// Fetch failed; any stale entry was left in place.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderRefresh {
    pub provider: String,
    #[serde(flatten)]
    pub outcome: RefreshOutcome,
}

/// Per-provider results of a batch refresh, in registry order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RefreshReport {
    pub providers: Vec<ProviderRefresh>,
}

impl RefreshReport {
    fn ids_where(&self, pred: impl Fn(&RefreshOutcome) -> bool) -> Vec<&str> {
        self.providers
            .iter()
            .filter(|p| pred(&p.outcome))
            .map(|p| p.provider.as_str())
            .collect()
    }

    #[must_use]
    pub fn refreshed(&self) -> Vec<&str> {
        self.ids_where(|o| matches!(o, RefreshOutcome::Refreshed { .. }))
    }

    #[must_use]
    pub fn skipped(&self) -> Vec<&str> {
        self.ids_where(|o| matches!(o, RefreshOutcome::SkippedNoCredential))
    }

    #[must_use]
    pub fn failed(&self) -> Vec<&str> {
        self.ids_where(|o| matches!(o, RefreshOutcome::Failed { .. }))
    }

    /// Outcome for one provider.
    #[must_use]
    pub fn outcome(&self, provider: &str) -> Option<&RefreshOutcome> {
        self.providers
            .iter()
            .find(|p| p.provider == provider)
            .map(|p| &p.outcome)
    }
}

fn elapsed_ms(started: Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}

// =============================================================================
// Synchronizer
// =============================================================================

/// Provider-agnostic model access over cache, credentials, and live APIs.
pub struct ModelSynchronizer {
    registry: ProviderRegistry,
    credentials: CredentialStore,
    cache: ModelCache,
    client: ProviderClient,
    clock: Clock,
}

impl ModelSynchronizer {
    #[must_use]
    pub const fn new(
        registry: ProviderRegistry,
        credentials: CredentialStore,
        cache: ModelCache,
        client: ProviderClient,
        clock: Clock,
    ) -> Self {
        Self {
            registry,
            credentials,
            cache,
            client,
            clock,
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    #[must_use]
    pub const fn cache(&self) -> &ModelCache {
        &self.cache
    }

    /// Seed built-in defaults into an empty cache.
    pub fn initialize(&self) {
        self.cache.initialize_with_defaults();
    }

    /// Models for `provider_id`.
    ///
    /// A fresh cache entry is returned without network access unless
    /// `force_refresh` is set. A failed fetch falls back to the cached entry
    /// even when expired.
    ///
    /// # Errors
    ///
    /// - [`ModelSyncError::ProviderNotFound`] for unknown ids
    /// - [`ModelSyncError::MissingCredential`] when a required key is absent
    /// - The fetch error, when there is no cached data to fall back to
    pub async fn get_models(&self, provider_id: &str, force_refresh: bool) -> Result<Vec<Model>> {
        let provider = self.registry.require(provider_id)?;
        if !force_refresh {
            if let Some(models) = self.cache.get(provider_id) {
                tracing::debug!(provider = provider_id, count = models.len(), "Cache hit");
                return Ok(enrich(provider_id, models, self.clock.now()));
            }
        }

        match self.fetch_and_store(provider).await {
            Ok(models) => Ok(models),
            Err(e @ ModelSyncError::MissingCredential { .. }) => Err(e),
            Err(e) => {
                let Some(stale) = self.cache.get_stale(provider_id) else {
                    tracing::warn!(provider = provider_id, error = %e, "Fetch failed with no cached fallback");
                    return Err(e);
                };
                tracing::warn!(
                    provider = provider_id,
                    error = %e,
                    count = stale.len(),
                    "Fetch failed, serving cached models"
                );
                Ok(enrich(provider_id, stale, self.clock.now()))
            }
        }
    }

    /// Every fresh cache entry, enriched.
    #[must_use]
    pub fn get_all_cached(&self) -> std::collections::BTreeMap<String, Vec<Model>> {
        let now = self.clock.now();
        self.cache
            .get_all()
            .into_iter()
            .map(|(provider, models)| {
                let models = enrich(&provider, models, now);
                (provider, models)
            })
            .collect()
    }

    /// Refresh every provider whose entry is stale, concurrently.
    ///
    /// Providers that need a key and have none are skipped. One provider's
    /// failure never affects the others.
    pub async fn refresh_stale(&self) -> RefreshReport {
        let started = Instant::now();
        let tasks = self
            .registry
            .all()
            .iter()
            .map(|provider| self.refresh_one(provider));
        let providers = join_all(tasks).await;

        let report = RefreshReport { providers };
        tracing::info!(
            refreshed = report.refreshed().len(),
            skipped = report.skipped().len(),
            failed = report.failed().len(),
            duration_ms = elapsed_ms(started),
            "Stale refresh finished"
        );
        report
    }

    async fn refresh_one(&self, provider: &ProviderConfig) -> ProviderRefresh {
        let outcome = if provider.requires_api_key && !self.credentials.has(&provider.id) {
            tracing::debug!(provider = %provider.id, "Skipping refresh: no API key");
            RefreshOutcome::SkippedNoCredential
        } else if !self.cache.needs_refresh(&provider.id) {
            RefreshOutcome::UpToDate
        } else {
            match self.fetch_and_store(provider).await {
                Ok(models) => RefreshOutcome::Refreshed {
                    count: models.len(),
                },
                Err(e) => {
                    tracing::warn!(provider = %provider.id, error = %e, "Refresh failed");
                    RefreshOutcome::Failed {
                        error: e.to_string(),
                    }
                }
            }
        };
        ProviderRefresh {
            provider: provider.id.clone(),
            outcome,
        }
    }

    /// Fetch live models, enrich, and overwrite the cache entry.
    async fn fetch_and_store(&self, provider: &ProviderConfig) -> Result<Vec<Model>> {
        let key = self.credentials.get(&provider.id);
        if provider.requires_api_key && key.is_empty() {
            return Err(ModelSyncError::MissingCredential {
                provider: provider.id.clone(),
            });
        }
        let key = (!key.is_empty()).then_some(key.as_str());

        let started = Instant::now();
        let raw = self.client.list_models(provider, key).await?;
        let models: Vec<Model> = raw.iter().map(|r| to_model(&provider.id, r)).collect();
        let models = enrich(&provider.id, models, self.clock.now());

        if let Err(e) = self.cache.put(&provider.id, models.clone()) {
            tracing::warn!(provider = %provider.id, error = %e, "Failed to cache fetched models");
        }
        tracing::info!(
            provider = %provider.id,
            model_count = models.len(),
            duration_ms = elapsed_ms(started),
            "Fetched models"
        );
        Ok(models)
    }

    /// Store `api_key` for `provider_id` without verifying it.
    ///
    /// # Errors
    ///
    /// Unknown provider, or the credential map cannot be written.
    pub fn save_credential(&self, provider_id: &str, api_key: &str) -> Result<()> {
        let provider = self.registry.require(provider_id)?;
        if !provider.key_format_matches(api_key) {
            tracing::warn!(
                provider = provider_id,
                expected = provider.key_format.as_deref().unwrap_or("non-empty"),
                "API key does not match the documented format"
            );
        }
        self.credentials.save(provider_id, api_key.trim())
    }

    /// Check `api_key` against the provider.
    ///
    /// On success the key is stored and marked verified. On failure the
    /// stored entry, if it holds this same key, is marked unverified. Bad
    /// keys and network failures are reported, never returned as errors.
    ///
    /// # Errors
    ///
    /// Unknown provider, or the credential map cannot be written.
    pub async fn verify_credential(
        &self,
        provider_id: &str,
        api_key: &str,
    ) -> Result<VerificationReport> {
        let provider = self.registry.require(provider_id)?;
        let api_key = api_key.trim();
        let report = |verified: bool, status: Option<u16>, message: String| VerificationReport {
            provider: provider_id.to_string(),
            verified,
            status,
            message,
        };

        if api_key.is_empty() {
            return Ok(report(false, None, "API key is empty".to_string()));
        }

        let (verified, status, message) = match self.client.verify_key(provider, api_key).await {
            Ok(outcome) if outcome.ok => (
                true,
                Some(outcome.status),
                format!("{} accepted the API key", provider.name),
            ),
            Ok(outcome) => (
                false,
                Some(outcome.status),
                format!("{} rejected the API key (HTTP {})", provider.name, outcome.status),
            ),
            Err(e) => (false, None, format!("Could not reach {}: {e}", provider.name)),
        };

        let now = self.clock.now();
        if verified {
            self.credentials.save(provider_id, api_key)?;
            self.credentials.mark_verified(provider_id, true, now)?;
            tracing::info!(provider = provider_id, "API key verified");
        } else {
            if self.credentials.get(provider_id) == api_key {
                self.credentials.mark_verified(provider_id, false, now)?;
            }
            tracing::warn!(provider = provider_id, status, "API key verification failed");
        }

        Ok(report(verified, status, message))
    }

    /// Remove the stored key and cached models for `provider_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    pub fn remove_credential(&self, provider_id: &str) -> Result<()> {
        self.credentials.remove(provider_id)?;
        self.cache.clear(Some(provider_id))?;
        tracing::info!(provider = provider_id, "Removed credential and cached models");
        Ok(())
    }

    /// Drop every stored key and the whole model cache.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be modified.
    pub fn clear_all_data(&self) -> Result<()> {
        self.credentials.clear()?;
        self.cache.clear(None)?;
        tracing::info!("Cleared all stored keys and cached models");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::SyncFixture;

    #[tokio::test]
    async fn fresh_cache_needs_no_network() {
        // Base URLs point nowhere; any network attempt would fail.
        let fixture = SyncFixture::unreachable();
        fixture.sync.initialize();

        let models = fixture.sync.get_models("openai", false).await.unwrap();
        assert!(!models.is_empty());
        assert!(models.iter().all(|m| m.enhanced == Some(true)));
    }

    #[tokio::test]
    async fn unknown_provider_is_config_error() {
        let fixture = SyncFixture::unreachable();
        let err = fixture.sync.get_models("acme", false).await.unwrap_err();
        assert!(matches!(err, ModelSyncError::ProviderNotFound { .. }));
    }

    #[tokio::test]
    async fn missing_credential_skips_stale_fallback() {
        let fixture = SyncFixture::unreachable();
        fixture.sync.initialize();
        fixture.clock.advance(std::time::Duration::from_secs(25 * 3600));

        let err = fixture.sync.get_models("openai", false).await.unwrap_err();
        assert!(matches!(err, ModelSyncError::MissingCredential { .. }));
    }

    #[tokio::test]
    async fn refresh_skips_providers_without_keys() {
        let fixture = SyncFixture::unreachable();
        let report = fixture.sync.refresh_stale().await;
        assert_eq!(report.skipped().len(), fixture.sync.registry().all().len());
        assert!(report.failed().is_empty());
    }

    #[tokio::test]
    async fn empty_key_fails_verification_without_network() {
        let fixture = SyncFixture::unreachable();
        let report = fixture.sync.verify_credential("openai", "   ").await.unwrap();
        assert!(!report.verified);
        assert!(report.status.is_none());
        assert!(!fixture.sync.credentials().has("openai"));
    }

    #[test]
    fn clear_all_data_empties_both_maps() {
        let fixture = SyncFixture::unreachable();
        fixture.sync.initialize();
        fixture.sync.save_credential("openai", "sk-test").unwrap();

        fixture.sync.clear_all_data().unwrap();
        assert!(fixture.sync.credentials().list_all().is_empty());
        assert!(fixture.sync.get_all_cached().is_empty());
        assert!(fixture.kv.is_empty());
    }

    #[test]
    fn remove_credential_drops_cache_entry() {
        let fixture = SyncFixture::unreachable();
        fixture.sync.initialize();
        fixture.sync.save_credential("groq", "gsk_test").unwrap();

        fixture.sync.remove_credential("groq").unwrap();
        assert_eq!(fixture.sync.credentials().get("groq"), "");
        assert!(fixture.sync.cache().get("groq").is_none());
        assert!(fixture.sync.cache().get("openai").is_some());
    }
}
