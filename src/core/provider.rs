//! Provider descriptors and registry.
//!
//! Built-in providers are static; custom providers come from the config file
//! and are flagged `custom = true`.

use serde::{Deserialize, Serialize};

use crate::error::{ModelSyncError, Result};
use crate::storage::config::{Config, CustomProviderSettings};

// =============================================================================
// Auth Style
// =============================================================================

/// Wire shape used to authenticate against a provider API.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`, OpenAI-compatible `GET /models`.
    #[default]
    Bearer,
    /// `x-api-key` + `anthropic-version`, `POST /messages` for verification.
    Anthropic,
}

/// `anthropic-version` header value.
pub const ANTHROPIC_VERSION: &str = "2023-06-01";

// =============================================================================
// Provider Config
// =============================================================================

/// Static descriptor for one AI provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderConfig {
    pub id: String,
    pub name: String,
    pub description: String,
    pub base_url: String,
    pub requires_api_key: bool,
    /// Example key shape, e.g. `sk-...`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub custom: bool,
    #[serde(default)]
    pub auth_style: AuthStyle,
}

impl ProviderConfig {
    /// `{base_url}/models`.
    #[must_use]
    pub fn models_url(&self) -> String {
        format!("{}/models", self.base_url.trim_end_matches('/'))
    }

    /// `{base_url}/messages`.
    #[must_use]
    pub fn messages_url(&self) -> String {
        format!("{}/messages", self.base_url.trim_end_matches('/'))
    }

    /// Advisory check of a key against the documented key prefix.
    ///
    /// Providers without a `key_format` accept anything non-empty.
    #[must_use]
    pub fn key_format_matches(&self, key: &str) -> bool {
        let key = key.trim();
        if key.is_empty() {
            return false;
        }
        self.key_format.as_deref().is_none_or(|format| {
            let prefix = format.split("...").next().unwrap_or_default();
            key.starts_with(prefix)
        })
    }
}

impl From<&CustomProviderSettings> for ProviderConfig {
    fn from(settings: &CustomProviderSettings) -> Self {
        Self {
            id: settings.id.clone(),
            name: settings.name.clone().unwrap_or_else(|| settings.id.clone()),
            description: settings.description.clone().unwrap_or_default(),
            base_url: settings.base_url.clone(),
            requires_api_key: settings.requires_api_key,
            key_format: settings.key_format.clone(),
            docs_url: settings.docs_url.clone(),
            logo_url: None,
            custom: true,
            auth_style: settings.auth_style,
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn builtin(
    id: &str,
    name: &str,
    description: &str,
    base_url: &str,
    key_format: Option<&str>,
    docs_url: &str,
    logo_url: &str,
    auth_style: AuthStyle,
) -> ProviderConfig {
    ProviderConfig {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        base_url: base_url.to_string(),
        requires_api_key: true,
        key_format: key_format.map(str::to_string),
        docs_url: Some(docs_url.to_string()),
        logo_url: Some(logo_url.to_string()),
        custom: false,
        auth_style,
    }
}

/// Built-in provider ids in display order.
pub const BUILTIN_PROVIDER_IDS: &[&str] = &[
    "openrouter",
    "openai",
    "xai",
    "mistral",
    "deepseek",
    "groq",
    "anthropic",
];

fn builtin_providers() -> Vec<ProviderConfig> {
    vec![
        builtin(
            "openrouter",
            "OpenRouter",
            "Access to multiple AI models through a single API",
            "https://openrouter.ai/api/v1",
            Some("sk-or-v1-..."),
            "https://openrouter.ai/docs",
            "https://openrouter.ai/favicon.ico",
            AuthStyle::Bearer,
        ),
        builtin(
            "openai",
            "OpenAI",
            "GPT-4, GPT-3.5, and other OpenAI models",
            "https://api.openai.com/v1",
            Some("sk-..."),
            "https://platform.openai.com/docs",
            "https://openai.com/favicon.ico",
            AuthStyle::Bearer,
        ),
        builtin(
            "xai",
            "xAI (Grok)",
            "Grok models by xAI",
            "https://api.x.ai/v1",
            Some("xai-..."),
            "https://docs.x.ai",
            "https://x.ai/favicon.ico",
            AuthStyle::Bearer,
        ),
        builtin(
            "mistral",
            "Mistral AI",
            "Mistral and Mixtral models",
            "https://api.mistral.ai/v1",
            None,
            "https://docs.mistral.ai",
            "https://mistral.ai/favicon.ico",
            AuthStyle::Bearer,
        ),
        builtin(
            "deepseek",
            "DeepSeek",
            "DeepSeek Coder and Chat models",
            "https://api.deepseek.com/v1",
            Some("sk-..."),
            "https://platform.deepseek.com/docs",
            "https://platform.deepseek.com/favicon.ico",
            AuthStyle::Bearer,
        ),
        builtin(
            "groq",
            "Groq",
            "Ultra-fast AI inference with Llama, Mixtral, and Gemma",
            "https://api.groq.com/openai/v1",
            None,
            "https://console.groq.com/docs",
            "https://groq.com/favicon.ico",
            AuthStyle::Bearer,
        ),
        builtin(
            "anthropic",
            "Anthropic",
            "Claude models by Anthropic",
            "https://api.anthropic.com/v1",
            None,
            "https://docs.anthropic.com",
            "https://anthropic.com/favicon.ico",
            AuthStyle::Anthropic,
        ),
    ]
}

// =============================================================================
// Provider Registry
// =============================================================================

/// Known providers, built-in first then custom, in insertion order.
#[derive(Debug, Clone)]
pub struct ProviderRegistry {
    providers: Vec<ProviderConfig>,
}

impl ProviderRegistry {
    /// Registry containing only the built-in providers.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            providers: builtin_providers(),
        }
    }

    /// Registry from an explicit provider list (tests, embedding).
    #[must_use]
    pub const fn from_providers(providers: Vec<ProviderConfig>) -> Self {
        Self { providers }
    }

    /// Built-ins with config overrides applied and custom providers appended.
    ///
    /// # Errors
    ///
    /// Returns an error if a custom provider collides with an existing id.
    pub fn with_config(config: &Config) -> Result<Self> {
        let mut registry = Self::builtin();

        for (id, settings) in &config.providers.overrides {
            let Some(provider) = registry.providers.iter_mut().find(|p| &p.id == id) else {
                tracing::warn!(provider = %id, "Ignoring override for unknown provider");
                continue;
            };
            if let Some(base_url) = &settings.base_url {
                tracing::debug!(provider = %id, base_url = %base_url, "Applying base URL override");
                provider.base_url.clone_from(base_url);
            }
        }

        for custom in &config.providers.custom {
            registry.add_custom(ProviderConfig::from(custom))?;
        }

        Ok(registry)
    }

    /// Look up a provider by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.id == id)
    }

    /// Look up a provider by id or fail with `ProviderNotFound`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelSyncError::ProviderNotFound`] for unknown ids.
    pub fn require(&self, id: &str) -> Result<&ProviderConfig> {
        self.get(id).ok_or_else(|| ModelSyncError::ProviderNotFound {
            provider: id.to_string(),
        })
    }

    /// All providers.
    #[must_use]
    pub fn all(&self) -> &[ProviderConfig] {
        &self.providers
    }

    /// All provider ids.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.id.as_str()).collect()
    }

    /// Add a user-defined provider.
    ///
    /// # Errors
    ///
    /// Returns an error if the id is empty or already registered.
    pub fn add_custom(&mut self, mut provider: ProviderConfig) -> Result<()> {
        if provider.id.trim().is_empty() {
            return Err(ModelSyncError::ConfigInvalid {
                key: "providers.custom.id".to_string(),
                message: "provider id must not be empty".to_string(),
            });
        }
        if self.get(&provider.id).is_some() {
            return Err(ModelSyncError::ConfigInvalid {
                key: "providers.custom.id".to_string(),
                message: format!("provider '{}' is already registered", provider.id),
            });
        }
        provider.custom = true;
        self.providers.push(provider);
        Ok(())
    }

    /// Remove a user-defined provider. Built-ins cannot be removed.
    ///
    /// Returns whether a provider was removed.
    pub fn remove_custom(&mut self, id: &str) -> bool {
        let before = self.providers.len();
        self.providers.retain(|p| !(p.custom && p.id == id));
        self.providers.len() != before
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::config::ProviderOverride;

    #[test]
    fn builtin_ids_in_order() {
        let registry = ProviderRegistry::builtin();
        assert_eq!(registry.ids(), BUILTIN_PROVIDER_IDS);
    }

    #[test]
    fn anthropic_uses_anthropic_auth() {
        let registry = ProviderRegistry::builtin();
        let anthropic = registry.get("anthropic").unwrap();
        assert_eq!(anthropic.auth_style, AuthStyle::Anthropic);
        assert_eq!(
            anthropic.messages_url(),
            "https://api.anthropic.com/v1/messages"
        );
        assert_eq!(
            registry.get("openai").unwrap().auth_style,
            AuthStyle::Bearer
        );
    }

    #[test]
    fn require_unknown_provider_fails() {
        let registry = ProviderRegistry::builtin();
        let err = registry.require("acme").unwrap_err();
        assert!(matches!(err, ModelSyncError::ProviderNotFound { .. }));
    }

    #[test]
    fn key_format_prefix_check() {
        let registry = ProviderRegistry::builtin();
        let openrouter = registry.get("openrouter").unwrap();
        assert!(openrouter.key_format_matches("sk-or-v1-abc"));
        assert!(!openrouter.key_format_matches("sk-abc"));

        let groq = registry.get("groq").unwrap();
        assert!(groq.key_format_matches("gsk_anything"));
        assert!(!groq.key_format_matches("   "));
    }

    #[test]
    fn models_url_trims_trailing_slash() {
        let mut provider = ProviderRegistry::builtin().get("openai").unwrap().clone();
        provider.base_url = "http://localhost:9999/v1/".to_string();
        assert_eq!(provider.models_url(), "http://localhost:9999/v1/models");
    }

    #[test]
    fn with_config_applies_overrides_and_customs() {
        let mut config = Config::default();
        config.providers.overrides.insert(
            "openai".to_string(),
            ProviderOverride {
                base_url: Some("http://127.0.0.1:1/v1".to_string()),
            },
        );
        config.providers.custom.push(CustomProviderSettings {
            id: "local".to_string(),
            name: Some("Local LLM".to_string()),
            description: None,
            base_url: "http://127.0.0.1:8080/v1".to_string(),
            requires_api_key: false,
            key_format: None,
            docs_url: None,
            auth_style: AuthStyle::Bearer,
        });

        let registry = ProviderRegistry::with_config(&config).unwrap();
        assert_eq!(
            registry.get("openai").unwrap().base_url,
            "http://127.0.0.1:1/v1"
        );
        let local = registry.get("local").unwrap();
        assert!(local.custom);
        assert!(!local.requires_api_key);
        assert_eq!(local.name, "Local LLM");
    }

    #[test]
    fn custom_cannot_shadow_builtin() {
        let mut registry = ProviderRegistry::builtin();
        let mut dup = registry.get("openai").unwrap().clone();
        dup.custom = true;
        assert!(registry.add_custom(dup).is_err());
    }

    #[test]
    fn remove_custom_keeps_builtins() {
        let mut registry = ProviderRegistry::builtin();
        assert!(!registry.remove_custom("openai"));
        assert!(registry.get("openai").is_some());

        let mut custom = registry.get("groq").unwrap().clone();
        custom.id = "mine".to_string();
        registry.add_custom(custom).unwrap();
        assert!(registry.remove_custom("mine"));
        assert!(registry.get("mine").is_none());
    }
}
