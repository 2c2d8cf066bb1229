//! Provider API clients.
//!
//! Two wire shapes are supported:
//! - [`openai_compat`]: `Authorization: Bearer`, `GET /models` for both
//!   listing and verification
//! - [`anthropic`]: `x-api-key` + `anthropic-version`, `GET /models` for
//!   listing and a one-token `POST /messages` for verification
//!
//! Model list responses are accepted as `{"data": [..]}`, `{"models": [..]}`
//! or a bare array. Entries without a string `id` are skipped.

pub mod anthropic;
pub mod openai_compat;

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Deserializer, Serialize};

use crate::core::http::{DEFAULT_TIMEOUT, build_client, send_for_body, send_for_status};
use crate::core::provider::{AuthStyle, ProviderConfig};
use crate::error::{ModelSyncError, Result};

// =============================================================================
// Raw API Shapes
// =============================================================================

/// One model entry as returned by a provider's `/models` endpoint.
///
/// Every field except `id` is optional and type-tolerant; values of an
/// unexpected JSON type read as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawModel {
    pub id: String,
    #[serde(default, alias = "display_name", deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub context_length: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub max_tokens: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub created: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub multimodal: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub function_calling: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub json_mode: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub pricing: Option<RawPricing>,
}

/// Pricing block; only numeric values are used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPricing {
    #[serde(default, deserialize_with = "lenient")]
    pub prompt: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub completion: Option<f64>,
}

/// Deserialize `T` if the value has the right shape, otherwise `None`.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModelsResponse {
    Data { data: Vec<serde_json::Value> },
    Models { models: Vec<serde_json::Value> },
    Bare(Vec<serde_json::Value>),
}

impl ModelsResponse {
    fn into_models(self, provider: &str) -> Vec<RawModel> {
        let entries = match self {
            Self::Data { data } => data,
            Self::Models { models } => models,
            Self::Bare(entries) => entries,
        };
        let total = entries.len();
        let models: Vec<RawModel> = entries
            .into_iter()
            .filter_map(|entry| serde_json::from_value(entry).ok())
            .collect();
        if models.len() < total {
            tracing::debug!(
                provider,
                skipped = total - models.len(),
                "Skipped model entries without an id"
            );
        }
        models
    }
}

/// Parse a `/models` response body.
///
/// # Errors
///
/// Returns [`ModelSyncError::ParseResponse`] if the body matches
/// none of the accepted shapes.
pub fn parse_models_response(provider: &str, body: &str) -> Result<Vec<RawModel>> {
    let response: ModelsResponse = serde_json::from_str(body)
        .map_err(|e| ModelSyncError::ParseResponse(format!("{provider}: {e}")))?;
    Ok(response.into_models(provider))
}

// =============================================================================
// Client
// =============================================================================

/// Result of a key verification round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOutcome {
    /// HTTP status returned by the provider.
    pub status: u16,
    /// Whether the status counts as a verified key (2xx only).
    pub ok: bool,
}

/// HTTP client for provider model and verification endpoints.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: Client,
    timeout: Duration,
}

impl ProviderClient {
    /// Client with the given request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_client(timeout)?,
            timeout,
        })
    }

    /// Client with [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_default_timeout() -> Result<Self> {
        Self::new(DEFAULT_TIMEOUT)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `GET {base_url}/models`, authenticated when a key is given.
    ///
    /// # Errors
    ///
    /// Network, non-2xx, and undecodable responses are errors.
    pub async fn list_models(
        &self,
        provider: &ProviderConfig,
        api_key: Option<&str>,
    ) -> Result<Vec<RawModel>> {
        let url = provider.models_url();
        let mut request = self.http.get(&url);
        if let Some(key) = api_key {
            request = match provider.auth_style {
                AuthStyle::Bearer => openai_compat::authorize(request, key),
                AuthStyle::Anthropic => anthropic::authorize(request, key),
            };
        }

        tracing::debug!(provider = %provider.id, url = %url, "Fetching models");
        let body = send_for_body(request, &provider.id, self.timeout).await?;
        parse_models_response(&provider.id, &body)
    }

    /// Probe the provider with `api_key`.
    ///
    /// Only 2xx counts as verified; a 401 is a definite failure.
    ///
    /// # Errors
    ///
    /// Returns an error only when no HTTP response was received.
    pub async fn verify_key(&self, provider: &ProviderConfig, api_key: &str) -> Result<VerifyOutcome> {
        let request = match provider.auth_style {
            AuthStyle::Bearer => openai_compat::verification_request(&self.http, provider, api_key),
            AuthStyle::Anthropic => anthropic::verification_request(&self.http, provider, api_key),
        };

        let status = send_for_status(request, self.timeout).await?;
        tracing::debug!(provider = %provider.id, status = status.as_u16(), "Verification response");
        Ok(VerifyOutcome {
            status: status.as_u16(),
            ok: status.is_success(),
        })
    }
}
