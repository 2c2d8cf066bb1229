//! Anthropic-shaped providers.
//!
//! Auth is `x-api-key` plus a pinned `anthropic-version`. Keys are verified
//! with the cheapest possible `POST /messages` (one output token).

use reqwest::{Client, RequestBuilder};
use serde::Serialize;

use crate::core::provider::{ANTHROPIC_VERSION, ProviderConfig};

/// Model used for the verification probe.
pub const VERIFY_MODEL: &str = "claude-3-haiku-20240307";

#[derive(Debug, Serialize)]
struct ProbeMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ProbeRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: [ProbeMessage<'a>; 1],
}

/// Attach `x-api-key` and `anthropic-version`.
#[must_use]
pub fn authorize(request: RequestBuilder, api_key: &str) -> RequestBuilder {
    request
        .header("x-api-key", api_key)
        .header("anthropic-version", ANTHROPIC_VERSION)
}

/// One-token message request against `{base_url}/messages`.
#[must_use]
pub fn verification_request(http: &Client, provider: &ProviderConfig, api_key: &str) -> RequestBuilder {
    let probe = ProbeRequest {
        model: VERIFY_MODEL,
        max_tokens: 1,
        messages: [ProbeMessage {
            role: "user",
            content: "test",
        }],
    };
    authorize(http.post(provider.messages_url()), api_key).json(&probe)
}
