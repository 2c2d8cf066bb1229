//! Provider API key storage.
//!
//! Keys are stored base64-encoded. This is **obfuscation, not encryption**:
//! it keeps raw secrets out of casual view in the store files and nothing
//! more. Anyone with read access to the store can recover every key.
//!
//! Every read path tolerates a missing or corrupt credential map and treats
//! it as empty.

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::clock::Clock;
use crate::error::Result;
use crate::storage::kv::{CREDENTIALS_KEY, KeyValueStore};

/// One stored API key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialEntry {
    /// Provider id this key belongs to.
    pub provider: String,
    /// Obfuscated key material.
    pub api_key: String,
    /// When the key was saved.
    pub added_at: DateTime<Utc>,
    /// Result of the most recent verification round-trip.
    pub is_verified: bool,
    /// When the key was last verified.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_verified: Option<DateTime<Utc>>,
}

/// Credential map keyed by provider id.
pub type CredentialMap = BTreeMap<String, CredentialEntry>;

/// Reversible encoding of a raw key.
#[must_use]
pub fn obfuscate(raw: &str) -> String {
    STANDARD.encode(raw.as_bytes())
}

/// Inverse of [`obfuscate`]; `None` if the stored value is not valid.
#[must_use]
pub fn reveal(obfuscated: &str) -> Option<String> {
    let bytes = STANDARD.decode(obfuscated.as_bytes()).ok()?;
    String::from_utf8(bytes).ok()
}

/// Per-provider credential store.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn KeyValueStore>,
    clock: Clock,
}

impl CredentialStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, clock: Clock) -> Self {
        Self { store, clock }
    }

    /// Store `raw_key` for `provider`, unverified, replacing any prior entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential map cannot be written.
    pub fn save(&self, provider: &str, raw_key: &str) -> Result<()> {
        let mut entries = self.list_all();
        entries.insert(
            provider.to_string(),
            CredentialEntry {
                provider: provider.to_string(),
                api_key: obfuscate(raw_key),
                added_at: self.clock.now(),
                is_verified: false,
                last_verified: None,
            },
        );
        self.write(&entries)?;
        tracing::debug!(provider, key_len = raw_key.len(), "Saved API key");
        Ok(())
    }

    /// The de-obfuscated key, or an empty string if none is usable.
    #[must_use]
    pub fn get(&self, provider: &str) -> String {
        self.list_all()
            .get(provider)
            .and_then(|entry| {
                let key = reveal(&entry.api_key);
                if key.is_none() {
                    tracing::warn!(provider, "Stored API key could not be decoded");
                }
                key
            })
            .unwrap_or_default()
    }

    /// Whether an entry exists for `provider`.
    #[must_use]
    pub fn has(&self, provider: &str) -> bool {
        self.list_all().contains_key(provider)
    }

    /// Stored entry for `provider`.
    #[must_use]
    pub fn entry(&self, provider: &str) -> Option<CredentialEntry> {
        self.list_all().remove(provider)
    }

    /// Delete the entry for `provider`. No-op if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential map cannot be written.
    pub fn remove(&self, provider: &str) -> Result<()> {
        let mut entries = self.list_all();
        if entries.remove(provider).is_some() {
            self.write(&entries)?;
            tracing::debug!(provider, "Removed API key");
        }
        Ok(())
    }

    /// Every stored entry. Missing or corrupt data reads as empty.
    #[must_use]
    pub fn list_all(&self) -> CredentialMap {
        let raw = match self.store.get(CREDENTIALS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CredentialMap::new(),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read stored API keys");
                return CredentialMap::new();
            }
        };

        // `null` is accepted and treated as empty
        match serde_json::from_str::<Option<CredentialMap>>(&raw) {
            Ok(entries) => entries.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored API keys are corrupt, treating as empty");
                CredentialMap::new()
            }
        }
    }

    /// Record a verification result. No-op if `provider` has no entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential map cannot be written.
    pub fn mark_verified(&self, provider: &str, verified: bool, when: DateTime<Utc>) -> Result<()> {
        let mut entries = self.list_all();
        let Some(entry) = entries.get_mut(provider) else {
            return Ok(());
        };
        entry.is_verified = verified;
        entry.last_verified = Some(when);
        self.write(&entries)?;
        tracing::debug!(provider, verified, "Updated key verification status");
        Ok(())
    }

    /// Drop the whole credential map.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be modified.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(CREDENTIALS_KEY)
    }

    fn write(&self, entries: &CredentialMap) -> Result<()> {
        let content = serde_json::to_string(entries)?;
        self.store.set(CREDENTIALS_KEY, &content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::ManualClock;
    use crate::storage::kv::MemoryStore;
    use tracing_test::traced_test;

    fn make_store() -> (CredentialStore, Arc<MemoryStore>, ManualClock) {
        let kv = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(1_700_000_000_000);
        let store = CredentialStore::new(kv.clone(), clock.clock());
        (store, kv, clock)
    }

    #[test]
    fn obfuscation_is_reversible_and_not_plaintext() {
        let encoded = obfuscate("sk-test123");
        assert_ne!(encoded, "sk-test123");
        assert_eq!(reveal(&encoded).as_deref(), Some("sk-test123"));
        assert_eq!(reveal("%%% not base64 %%%"), None);
    }

    #[test]
    fn save_get_remove() {
        let (store, _, _) = make_store();

        store.save("openai", "sk-test123").unwrap();
        assert_eq!(store.get("openai"), "sk-test123");

        store.remove("openai").unwrap();
        assert_eq!(store.get("openai"), "");
        store.remove("openai").unwrap();
    }

    #[test]
    fn save_overwrites_and_resets_verification() {
        let (store, _, clock) = make_store();
        store.save("groq", "first").unwrap();
        store.mark_verified("groq", true, clock.clock().now()).unwrap();
        assert!(store.entry("groq").unwrap().is_verified);

        store.save("groq", "second").unwrap();
        let entry = store.entry("groq").unwrap();
        assert!(!entry.is_verified);
        assert!(entry.last_verified.is_none());
        assert_eq!(store.get("groq"), "second");
    }

    #[test]
    fn persisted_layout_is_obfuscated_camel_case() {
        let (store, kv, _) = make_store();
        store.save("openai", "sk-test123").unwrap();

        let raw = kv.get(CREDENTIALS_KEY).unwrap().unwrap();
        assert!(!raw.contains("sk-test123"));
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["openai"]["provider"], "openai");
        assert_eq!(json["openai"]["isVerified"], false);
        assert!(json["openai"]["addedAt"].as_str().unwrap().starts_with("2023-11-14"));
    }

    #[test]
    fn mark_verified_without_entry_is_noop() {
        let (store, kv, clock) = make_store();
        store.mark_verified("xai", true, clock.clock().now()).unwrap();
        assert!(kv.is_empty());
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn mark_verified_records_timestamp() {
        let (store, _, clock) = make_store();
        store.save("xai", "xai-abc").unwrap();
        clock.advance(std::time::Duration::from_secs(60));
        let when = clock.clock().now();
        store.mark_verified("xai", true, when).unwrap();

        let entry = store.entry("xai").unwrap();
        assert!(entry.is_verified);
        assert_eq!(entry.last_verified, Some(when));
    }

    #[test]
    #[traced_test]
    fn corrupt_map_reads_as_empty() {
        let (store, kv, _) = make_store();
        kv.set(CREDENTIALS_KEY, "{not json").unwrap();

        assert!(store.list_all().is_empty());
        assert_eq!(store.get("openai"), "");
        assert!(logs_contain("corrupt"));

        // A later save replaces the corrupt document
        store.save("openai", "sk-new").unwrap();
        assert_eq!(store.get("openai"), "sk-new");
    }

    #[test]
    fn null_map_reads_as_empty() {
        let (store, kv, _) = make_store();
        kv.set(CREDENTIALS_KEY, "null").unwrap();
        assert!(store.list_all().is_empty());
    }

    #[test]
    fn undecodable_key_reads_as_empty_string() {
        let (store, kv, _) = make_store();
        kv.set(
            CREDENTIALS_KEY,
            r#"{"openai":{"provider":"openai","apiKey":"@@@","addedAt":"2024-01-01T00:00:00Z","isVerified":false}}"#,
        )
        .unwrap();
        assert!(store.has("openai"));
        assert_eq!(store.get("openai"), "");
    }

    #[test]
    fn clear_removes_everything() {
        let (store, kv, _) = make_store();
        store.save("openai", "a").unwrap();
        store.save("groq", "b").unwrap();
        store.clear().unwrap();
        assert!(kv.get(CREDENTIALS_KEY).unwrap().is_none());
        assert!(store.list_all().is_empty());
    }
}
