//! Test utilities for modelsync.
//!
//! Provides model factories, provider response bodies, temp directories, and
//! a fully wired [`ModelSynchronizer`] over in-memory storage and a manual
//! clock.
//!
//! # Usage
//!
//! ```rust,ignore
//! use modelsync::test_utils::*;
//!
//! let fixture = SyncFixture::with_base_url(&mock_server.uri());
//! fixture.sync.save_credential("openai", "sk-test").unwrap();
//! fixture.clock.advance(hours(25));
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::core::clock::ManualClock;
use crate::core::models::{Model, ModelCapability};
use crate::core::provider::ProviderRegistry;
use crate::core::sync::ModelSynchronizer;
use crate::providers::ProviderClient;
use crate::storage::{CredentialStore, MemoryStore, ModelCache};

/// Fixed start instant for manual clocks (2023-11-14T22:13:20Z).
pub const TEST_EPOCH_MS: i64 = 1_700_000_000_000;

/// A base URL nothing listens on.
pub const UNREACHABLE_BASE_URL: &str = "http://127.0.0.1:1/v1";

// =============================================================================
// Test Data Factories
// =============================================================================

/// Model with identity fields, a context window, and prices.
#[must_use]
pub fn make_test_model(provider: &str, id: &str) -> Model {
    let mut model = Model::new(id, id.to_uppercase(), provider);
    model.context_length = Some(8192);
    model.input_cost_per_million = Some(1.0);
    model.output_cost_per_million = Some(2.0);
    model.capabilities = Some(vec![ModelCapability::FunctionCalling]);
    model
}

/// One [`make_test_model`] per id.
#[must_use]
pub fn make_test_models(provider: &str, ids: &[&str]) -> Vec<Model> {
    ids.iter().map(|id| make_test_model(provider, id)).collect()
}

/// OpenAI-style `/models` body: `{"object":"list","data":[{"id":..}, ..]}`.
#[must_use]
pub fn models_response_body(ids: &[&str]) -> serde_json::Value {
    let data: Vec<serde_json::Value> = ids
        .iter()
        .map(|id| serde_json::json!({ "id": id, "object": "model", "created": 1_715_367_049 }))
        .collect();
    serde_json::json!({ "object": "list", "data": data })
}

/// Whole hours as a [`Duration`].
#[must_use]
pub const fn hours(n: u64) -> Duration {
    Duration::from_secs(n * 3600)
}

// =============================================================================
// Sync Fixture
// =============================================================================

/// Synchronizer over in-memory storage with a controllable clock.
pub struct SyncFixture {
    pub sync: ModelSynchronizer,
    pub kv: Arc<MemoryStore>,
    pub clock: ManualClock,
}

impl SyncFixture {
    /// Built-in providers re-pointed at `base_url` (e.g. a wiremock server).
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn with_base_url(base_url: &str) -> Self {
        let providers = ProviderRegistry::builtin()
            .all()
            .iter()
            .cloned()
            .map(|mut provider| {
                provider.base_url = base_url.to_string();
                provider
            })
            .collect();
        Self::with_registry(ProviderRegistry::from_providers(providers))
    }

    /// Built-in providers pointed at a closed port.
    #[must_use]
    pub fn unreachable() -> Self {
        Self::with_base_url(UNREACHABLE_BASE_URL)
    }

    /// Fixture over an explicit registry.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built.
    #[must_use]
    pub fn with_registry(registry: ProviderRegistry) -> Self {
        let kv = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(TEST_EPOCH_MS);
        let credentials = CredentialStore::new(kv.clone(), clock.clock());
        let cache = ModelCache::new(kv.clone(), clock.clock());
        let client =
            ProviderClient::new(Duration::from_secs(5)).expect("Failed to build HTTP client");
        let sync = ModelSynchronizer::new(registry, credentials, cache, client, clock.clock());
        Self { sync, kv, clock }
    }
}

// =============================================================================
// Temporary Directories
// =============================================================================

/// Isolated temporary directory, removed on drop.
pub struct TestDir {
    inner: tempfile::TempDir,
}

impl TestDir {
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: tempfile::tempdir().expect("Failed to create temp directory"),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.inner.path()
    }

    /// Write `content` to `name`, creating parent directories.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.inner.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        fs::write(&path, content).expect("Failed to write test file");
        path
    }

    /// Full path for `name` inside the directory.
    #[must_use]
    pub fn file_path(&self, name: &str) -> PathBuf {
        self.inner.path().join(name)
    }
}

impl Default for TestDir {
    fn default() -> Self {
        Self::new()
    }
}
