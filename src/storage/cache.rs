//! Per-provider model list cache with a fixed 24 hour TTL.
//!
//! The whole cache is one JSON document in the key/value store:
//! `{ "<provider>": { "data": [Model..], "timestamp": <epoch ms> } }`.
//!
//! # Features
//! - Single TTL constant shared by every validity check
//! - Stale entries stay on disk so they can back an offline fallback
//! - Graceful degradation on missing/corrupt cache (reads as empty)

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::core::clock::Clock;
use crate::core::defaults::default_models;
use crate::core::models::Model;
use crate::error::Result;
use crate::storage::kv::{KeyValueStore, MODELS_CACHE_KEY};

/// Entry lifetime in milliseconds (24 hours).
pub const CACHE_TTL_MS: i64 = 24 * 60 * 60 * 1000;

const MS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// One provider's cached model list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub data: Vec<Model>,
    /// Write time, epoch milliseconds.
    pub timestamp: i64,
}

impl CacheEntry {
    /// Age relative to `now_ms`. Entries stamped in the future count as age 0.
    #[must_use]
    pub fn age_ms(&self, now_ms: i64) -> i64 {
        (now_ms - self.timestamp).max(0)
    }

    /// Whether the entry is still inside [`CACHE_TTL_MS`].
    #[must_use]
    pub fn is_fresh(&self, now_ms: i64) -> bool {
        now_ms - self.timestamp < CACHE_TTL_MS
    }
}

/// Summary of one provider's cache slot, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheStatus {
    pub provider: String,
    pub model_count: usize,
    pub age_hours: f64,
    pub fresh: bool,
}

/// Model list cache over a [`KeyValueStore`].
#[derive(Clone)]
pub struct ModelCache {
    store: Arc<dyn KeyValueStore>,
    clock: Clock,
}

impl ModelCache {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Store `models` for `provider`, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache document cannot be written.
    pub fn put(&self, provider: &str, models: Vec<Model>) -> Result<()> {
        let mut entries = self.read_entries();
        let count = models.len();
        entries.insert(
            provider.to_string(),
            CacheEntry {
                data: models,
                timestamp: self.clock.now_ms(),
            },
        );
        self.write_entries(&entries)?;
        tracing::debug!(provider, count, "Cached models");
        Ok(())
    }

    /// Fresh models for `provider`.
    ///
    /// `None` means absent or expired; `Some(vec![])` is a valid cached
    /// empty list.
    #[must_use]
    pub fn get(&self, provider: &str) -> Option<Vec<Model>> {
        let now = self.clock.now_ms();
        self.read_entries()
            .remove(provider)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.data)
    }

    /// Cached models for `provider` regardless of age.
    #[must_use]
    pub fn get_stale(&self, provider: &str) -> Option<Vec<Model>> {
        self.read_entries()
            .remove(provider)
            .map(|entry| entry.data)
    }

    /// Every fresh entry, keyed by provider id.
    #[must_use]
    pub fn get_all(&self) -> BTreeMap<String, Vec<Model>> {
        let now = self.clock.now_ms();
        self.read_entries()
            .into_iter()
            .filter(|(_, entry)| entry.is_fresh(now))
            .map(|(provider, entry)| (provider, entry.data))
            .collect()
    }

    /// True when `provider` has no entry or its entry has expired.
    #[must_use]
    pub fn needs_refresh(&self, provider: &str) -> bool {
        let now = self.clock.now_ms();
        self.read_entries()
            .get(provider)
            .is_none_or(|entry| !entry.is_fresh(now))
    }

    /// Hours since `provider` was last cached, fresh or not.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn cache_age_hours(&self, provider: &str) -> Option<f64> {
        let now = self.clock.now_ms();
        self.read_entries()
            .get(provider)
            .map(|entry| entry.age_ms(now) as f64 / MS_PER_HOUR)
    }

    /// One status row per cached provider, in id order.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn status(&self) -> Vec<CacheStatus> {
        let now = self.clock.now_ms();
        self.read_entries()
            .into_iter()
            .map(|(provider, entry)| CacheStatus {
                provider,
                model_count: entry.data.len(),
                age_hours: entry.age_ms(now) as f64 / MS_PER_HOUR,
                fresh: entry.is_fresh(now),
            })
            .collect()
    }

    /// Remove one provider's entry, or the whole cache when `provider` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache document cannot be written.
    pub fn clear(&self, provider: Option<&str>) -> Result<()> {
        match provider {
            Some(provider) => {
                let mut entries = self.read_entries();
                if entries.remove(provider).is_some() {
                    self.write_entries(&entries)?;
                    tracing::debug!(provider, "Cleared cached models");
                }
                Ok(())
            }
            None => {
                self.store.remove(MODELS_CACHE_KEY)?;
                tracing::debug!("Cleared model cache");
                Ok(())
            }
        }
    }

    /// Seed every built-in provider's defaults into an empty cache.
    ///
    /// A no-op as soon as any entry exists, expired ones included, so a
    /// provider cleared by the user is not brought back. Failures are
    /// logged, never returned.
    pub fn initialize_with_defaults(&self) {
        if !self.read_entries().is_empty() {
            tracing::debug!("Model cache already initialized");
            return;
        }

        let now = self.clock.now_ms();
        let entries: BTreeMap<String, CacheEntry> = default_models()
            .into_iter()
            .map(|(provider, models)| {
                (
                    provider,
                    CacheEntry {
                        data: models,
                        timestamp: now,
                    },
                )
            })
            .collect();

        match self.write_entries(&entries) {
            Ok(()) => tracing::info!(
                providers = ?entries.keys().collect::<Vec<_>>(),
                "Seeded model cache with defaults"
            ),
            Err(e) => tracing::warn!(error = %e, "Failed to seed model cache"),
        }
    }

    /// Raw entries regardless of age. Unreadable entries are skipped.
    fn read_entries(&self) -> BTreeMap<String, CacheEntry> {
        let raw = match self.store.get(MODELS_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return BTreeMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read model cache");
                return BTreeMap::new();
            }
        };

        let document: BTreeMap<String, serde_json::Value> =
            match serde_json::from_str::<Option<_>>(&raw) {
                Ok(document) => document.unwrap_or_default(),
                Err(e) => {
                    tracing::warn!(error = %e, "Model cache is corrupt, treating as empty");
                    return BTreeMap::new();
                }
            };

        document
            .into_iter()
            .filter_map(|(provider, value)| {
                match serde_json::from_value::<CacheEntry>(value) {
                    Ok(entry) => Some((provider, entry)),
                    Err(e) => {
                        tracing::warn!(provider = %provider, error = %e, "Skipping corrupt cache entry");
                        None
                    }
                }
            })
            .collect()
    }

    fn write_entries(&self, entries: &BTreeMap<String, CacheEntry>) -> Result<()> {
        let content = serde_json::to_string(entries)?;
        self.store.set(MODELS_CACHE_KEY, &content)
    }
}
