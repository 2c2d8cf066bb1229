//! Configuration file loading and management.
//!
//! Loads configuration from:
//! - Linux: `~/.config/modelsync/config.toml`
//! - macOS: `~/Library/Application Support/dev.modelsync.modelsync/config.toml`
//! - Windows: `%APPDATA%/modelsync/config/config.toml`
//!
//! ## Precedence
//!
//! Settings are resolved with the following precedence (highest first):
//! 1. CLI flags
//! 2. Environment variables
//! 3. Config file
//! 4. Built-in defaults
//!
//! ## Environment Variables
//!
//! - `MODELSYNC_TIMEOUT`: HTTP timeout in seconds
//! - `MODELSYNC_CONFIG`: Override config file path
//! - `MODELSYNC_DATA_DIR`: Override the data directory (see [`AppPaths`])
//!
//! ## Example
//!
//! ```toml
//! [general]
//! timeout_seconds = 20
//!
//! [providers.overrides.openai]
//! base_url = "http://localhost:4000/v1"
//!
//! [[providers.custom]]
//! id = "local"
//! name = "Local LLM"
//! base_url = "http://localhost:8080/v1"
//! requires_api_key = false
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::cli::args::Cli;
use crate::core::provider::{AuthStyle, BUILTIN_PROVIDER_IDS};
use crate::error::{ModelSyncError, Result};

// =============================================================================
// Environment Variable Names
// =============================================================================

/// Environment variable for timeout in seconds.
pub const ENV_TIMEOUT: &str = "MODELSYNC_TIMEOUT";
/// Environment variable to override config file path.
pub const ENV_CONFIG: &str = "MODELSYNC_CONFIG";

const MAX_TIMEOUT_SECS: u64 = 300;

// =============================================================================
// Resolved Configuration
// =============================================================================

/// Final configuration after merging CLI, env vars, and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Parsed and validated config file contents (or defaults).
    pub config: Config,
    /// File the config was read from (may not exist).
    pub config_path: PathBuf,
    /// HTTP request timeout.
    pub timeout: Duration,
    pub sources: ConfigSources,
}

/// Tracks the source of each resolved value.
#[derive(Debug, Clone, Default)]
pub struct ConfigSources {
    pub config_path: ConfigSource,
    pub timeout: ConfigSource,
}

/// Where a configuration value came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    /// Value from CLI flag.
    Cli,
    /// Value from environment variable.
    Env,
    /// Value from config file.
    ConfigFile,
    /// Built-in default.
    #[default]
    Default,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cli => write!(f, "CLI flag"),
            Self::Env => write!(f, "environment variable"),
            Self::ConfigFile => write!(f, "config file"),
            Self::Default => write!(f, "default"),
        }
    }
}

impl ResolvedConfig {
    /// Resolve configuration from CLI args, the process environment, and the
    /// config file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The config file exists but is not valid TOML
    /// - Any resolved value is out of range
    pub fn resolve(cli: &Cli) -> Result<Self> {
        Self::resolve_with(cli, |key| std::env::var(key).ok())
    }

    /// Like [`Self::resolve`] with an explicit environment lookup.
    ///
    /// # Errors
    ///
    /// See [`Self::resolve`].
    pub fn resolve_with(cli: &Cli, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut sources = ConfigSources::default();

        let config_path = Self::resolve_config_path(cli, &env, &mut sources.config_path);
        let config = Config::load_from(&config_path)?;
        config.validate()?;

        let timeout = Self::resolve_timeout(cli, &env, &config, &mut sources.timeout)?;

        Ok(Self {
            config,
            config_path,
            timeout,
            sources,
        })
    }

    fn resolve_config_path(
        cli: &Cli,
        env: &impl Fn(&str) -> Option<String>,
        source: &mut ConfigSource,
    ) -> PathBuf {
        // 1. CLI --config
        if let Some(path) = &cli.config {
            *source = ConfigSource::Cli;
            return path.clone();
        }

        // 2. Environment variable
        if let Some(path) = env(ENV_CONFIG).filter(|p| !p.trim().is_empty()) {
            *source = ConfigSource::Env;
            return PathBuf::from(path);
        }

        // 3. Default
        *source = ConfigSource::Default;
        Config::config_path()
    }

    fn resolve_timeout(
        cli: &Cli,
        env: &impl Fn(&str) -> Option<String>,
        config: &Config,
        source: &mut ConfigSource,
    ) -> Result<Duration> {
        // 1. CLI --timeout
        if let Some(timeout) = cli.timeout {
            *source = ConfigSource::Cli;
            return checked_timeout("--timeout", timeout);
        }

        // 2. Environment variable
        if let Some(raw) = env(ENV_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(timeout) => {
                    *source = ConfigSource::Env;
                    return checked_timeout(ENV_TIMEOUT, timeout);
                }
                Err(_) => {
                    tracing::warn!(value = %raw, "Ignoring non-numeric {ENV_TIMEOUT}");
                }
            }
        }

        // 3. Config file (already validated)
        *source = if config.general.timeout_seconds == GeneralConfig::default().timeout_seconds {
            ConfigSource::Default
        } else {
            ConfigSource::ConfigFile
        };
        Ok(Duration::from_secs(config.general.timeout_seconds))
    }
}

fn checked_timeout(key: &str, seconds: u64) -> Result<Duration> {
    if seconds == 0 || seconds > MAX_TIMEOUT_SECS {
        return Err(ModelSyncError::ConfigInvalid {
            key: key.to_string(),
            message: format!("timeout must be between 1 and {MAX_TIMEOUT_SECS} seconds"),
        });
    }
    Ok(Duration::from_secs(seconds))
}

// =============================================================================
// Config File
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings.
    pub general: GeneralConfig,
    /// Provider overrides and additions.
    pub providers: ProvidersConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// HTTP timeout for provider requests.
    pub timeout_seconds: u64,
    /// Default log level when neither `--log-level` nor `MODELSYNC_LOG` is set.
    pub log_level: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            log_level: None,
        }
    }
}

/// Provider configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Per-provider tweaks to built-in descriptors, keyed by provider id.
    pub overrides: HashMap<String, ProviderOverride>,
    /// User-defined providers.
    pub custom: Vec<CustomProviderSettings>,
}

/// Override for a built-in provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderOverride {
    /// Replacement API base URL (proxies, gateways, mocks).
    pub base_url: Option<String>,
}

/// A user-defined provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomProviderSettings {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub base_url: String,
    #[serde(default = "default_requires_api_key")]
    pub requires_api_key: bool,
    #[serde(default)]
    pub key_format: Option<String>,
    #[serde(default)]
    pub docs_url: Option<String>,
    #[serde(default)]
    pub auth_style: AuthStyle,
}

const fn default_requires_api_key() -> bool {
    true
}

impl Config {
    /// Load configuration from the default config file path.
    ///
    /// Returns default config if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file exists but is invalid.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific path.
    ///
    /// Returns default config if the file doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns an error only if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        tracing::debug!(?path, "Loading config file");
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ModelSyncError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Save configuration to a specific path.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the write fails.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| ModelSyncError::Config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content)?;
        tracing::debug!(?path, "Config file saved");
        Ok(())
    }

    /// Default config file path.
    #[must_use]
    pub fn config_path() -> PathBuf {
        AppPaths::new().config_file()
    }

    /// Validate configuration values.
    ///
    /// Checks that:
    /// - Timeout is within 1-300 seconds
    /// - Custom providers have a non-empty id and an http(s) base URL
    /// - Custom provider ids are unique and do not shadow built-ins
    /// - Override base URLs are http(s)
    ///
    /// # Errors
    ///
    /// Returns [`ModelSyncError::ConfigInvalid`] naming the first bad key.
    pub fn validate(&self) -> Result<()> {
        checked_timeout("general.timeout_seconds", self.general.timeout_seconds)?;

        for (id, settings) in &self.providers.overrides {
            if let Some(base_url) = &settings.base_url {
                check_base_url(&format!("providers.overrides.{id}.base_url"), base_url)?;
            }
        }

        let mut seen: Vec<&str> = Vec::new();
        for custom in &self.providers.custom {
            let id = custom.id.trim();
            if id.is_empty() {
                return Err(invalid("providers.custom.id", "provider id must not be empty"));
            }
            if BUILTIN_PROVIDER_IDS.contains(&id) {
                return Err(invalid(
                    "providers.custom.id",
                    &format!("'{id}' is a built-in provider; use providers.overrides.{id} instead"),
                ));
            }
            if seen.contains(&id) {
                return Err(invalid(
                    "providers.custom.id",
                    &format!("duplicate custom provider '{id}'"),
                ));
            }
            seen.push(id);
            check_base_url(&format!("providers.custom.{id}.base_url"), &custom.base_url)?;
        }

        Ok(())
    }
}

fn invalid(key: &str, message: &str) -> ModelSyncError {
    ModelSyncError::ConfigInvalid {
        key: key.to_string(),
        message: message.to_string(),
    }
}

fn check_base_url(key: &str, url: &str) -> Result<()> {
    let url = url.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(())
    } else {
        Err(invalid(key, "base URL must start with http:// or https://"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["modelsync"];
        argv.extend_from_slice(args);
        argv.push("providers");
        Cli::parse_from(argv)
    }

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{content}").unwrap();
        file
    }

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert_eq!(config.general.timeout_seconds, 30);
        assert!(config.providers.custom.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn load_missing_file_returns_default() {
        let config = Config::load_from(Path::new("/nonexistent/path/config.toml")).unwrap();
        assert_eq!(config.general.timeout_seconds, 30);
    }

    #[test]
    fn load_valid_toml() {
        let file = write_config(
            r#"
[general]
timeout_seconds = 60
log_level = "debug"

[providers.overrides.openai]
base_url = "http://localhost:4000/v1"

[[providers.custom]]
id = "local"
base_url = "http://localhost:8080/v1"
requires_api_key = false
auth_style = "bearer"
"#,
        );

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.general.timeout_seconds, 60);
        assert_eq!(config.general.log_level.as_deref(), Some("debug"));
        assert_eq!(
            config.providers.overrides["openai"].base_url.as_deref(),
            Some("http://localhost:4000/v1")
        );
        assert_eq!(config.providers.custom[0].id, "local");
        assert!(!config.providers.custom[0].requires_api_key);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn custom_provider_requires_key_by_default() {
        let file = write_config(
            r#"
[[providers.custom]]
id = "gateway"
base_url = "https://gateway.example.com/v1"
"#,
        );
        let config = Config::load_from(file.path()).unwrap();
        assert!(config.providers.custom[0].requires_api_key);
        assert_eq!(config.providers.custom[0].auth_style, AuthStyle::Bearer);
    }

    #[test]
    fn load_invalid_toml_is_parse_error() {
        let file = write_config("this is not valid toml {{{{");
        let err = Config::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ModelSyncError::ConfigParse { .. }));
    }

    #[test]
    fn roundtrip_save_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.general.timeout_seconds = 120;
        config.providers.overrides.insert(
            "groq".to_string(),
            ProviderOverride {
                base_url: Some("https://proxy.example.com/groq".to_string()),
            },
        );

        config.save_to(&path).unwrap();
        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.general.timeout_seconds, 120);
        assert!(loaded.providers.overrides.contains_key("groq"));
    }

    #[test]
    fn validate_timeout_bounds() {
        let mut config = Config::default();
        config.general.timeout_seconds = 0;
        assert!(config.validate().is_err());
        config.general.timeout_seconds = 301;
        assert!(config.validate().is_err());
        config.general.timeout_seconds = 300;
        assert!(config.validate().is_ok());
    }

    fn custom(id: &str, base_url: &str) -> CustomProviderSettings {
        CustomProviderSettings {
            id: id.to_string(),
            name: None,
            description: None,
            base_url: base_url.to_string(),
            requires_api_key: true,
            key_format: None,
            docs_url: None,
            auth_style: AuthStyle::Bearer,
        }
    }

    #[test]
    fn validate_rejects_builtin_shadowing() {
        let mut config = Config::default();
        config.providers.custom.push(custom("openai", "https://x.example.com"));
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("built-in"), "{err}");
    }

    #[test]
    fn validate_rejects_duplicates_and_bad_urls() {
        let mut config = Config::default();
        config.providers.custom.push(custom("a", "https://a.example.com"));
        config.providers.custom.push(custom("a", "https://b.example.com"));
        assert!(config.validate().unwrap_err().to_string().contains("duplicate"));

        let mut config = Config::default();
        config.providers.custom.push(custom("b", "ftp://b.example.com"));
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.providers.custom.push(custom("  ", "https://b.example.com"));
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolve_timeout_precedence() {
        let file = write_config("[general]\ntimeout_seconds = 45");
        let path = file.path().to_string_lossy().to_string();

        let env = |key: &str| match key {
            ENV_CONFIG => Some(path.clone()),
            ENV_TIMEOUT => Some("15".to_string()),
            _ => None,
        };

        let resolved = ResolvedConfig::resolve_with(&cli(&["--timeout", "5"]), env).unwrap();
        assert_eq!(resolved.timeout, Duration::from_secs(5));
        assert_eq!(resolved.sources.timeout, ConfigSource::Cli);
        assert_eq!(resolved.sources.config_path, ConfigSource::Env);

        let resolved = ResolvedConfig::resolve_with(&cli(&[]), env).unwrap();
        assert_eq!(resolved.timeout, Duration::from_secs(15));
        assert_eq!(resolved.sources.timeout, ConfigSource::Env);

        let file_only = |key: &str| (key == ENV_CONFIG).then(|| path.clone());
        let resolved = ResolvedConfig::resolve_with(&cli(&[]), file_only).unwrap();
        assert_eq!(resolved.timeout, Duration::from_secs(45));
        assert_eq!(resolved.sources.timeout, ConfigSource::ConfigFile);
    }

    #[test]
    fn resolve_rejects_out_of_range_cli_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("missing.toml");
        let config = config.to_string_lossy();
        let err =
            ResolvedConfig::resolve_with(&cli(&["--config", &config, "--timeout", "0"]), no_env)
                .unwrap_err();
        assert!(matches!(err, ModelSyncError::ConfigInvalid { .. }));
    }

    #[test]
    fn resolve_cli_config_path_wins() {
        let file = write_config("[general]\ntimeout_seconds = 90");
        let path = file.path().to_string_lossy().to_string();
        let resolved = ResolvedConfig::resolve_with(&cli(&["--config", &path]), no_env).unwrap();
        assert_eq!(resolved.sources.config_path, ConfigSource::Cli);
        assert_eq!(resolved.timeout, Duration::from_secs(90));
    }
}
