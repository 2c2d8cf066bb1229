//! Persistence: key/value store, credentials, model cache, config, paths.

pub mod cache;
pub mod config;
pub mod credentials;
pub mod kv;
pub mod paths;

pub use cache::{CACHE_TTL_MS, CacheEntry, CacheStatus, ModelCache};
pub use config::{
    Config, ConfigSource, ConfigSources, CustomProviderSettings, ENV_CONFIG, ENV_TIMEOUT,
    ProviderOverride, ResolvedConfig,
};
pub use credentials::{CredentialEntry, CredentialMap, CredentialStore};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use paths::AppPaths;
