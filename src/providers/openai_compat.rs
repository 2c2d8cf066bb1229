//! OpenAI-compatible providers (OpenAI, OpenRouter, xAI, Mistral, DeepSeek,
//! Groq, and most custom gateways).

use reqwest::{Client, RequestBuilder};

use crate::core::provider::ProviderConfig;

/// Attach `Authorization: Bearer <key>`.
#[must_use]
pub fn authorize(request: RequestBuilder, api_key: &str) -> RequestBuilder {
    request.bearer_auth(api_key)
}

/// Verification is an authenticated model listing.
#[must_use]
pub fn verification_request(http: &Client, provider: &ProviderConfig, api_key: &str) -> RequestBuilder {
    authorize(http.get(provider.models_url()), api_key)
}
