//! HTTP client utilities.
//!
//! Provides the shared HTTP client and error mapping for provider calls.

use std::time::Duration;

use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};

use crate::error::{ModelSyncError, Result};

/// Default timeout for HTTP requests.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on error body text carried into error messages.
const MAX_ERROR_BODY: usize = 200;

/// Build a configured HTTP client.
///
/// # Errors
///
/// Returns error if client construction fails.
pub fn build_client(timeout: Duration) -> Result<Client> {
    ClientBuilder::new()
        .timeout(timeout)
        .user_agent(format!("modelsync/{}", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| ModelSyncError::Network(e.to_string()))
}

fn map_send_error(e: &reqwest::Error, timeout: Duration) -> ModelSyncError {
    if e.is_timeout() {
        ModelSyncError::Timeout(timeout.as_secs())
    } else {
        ModelSyncError::Network(e.to_string())
    }
}

/// Send a request and return the body of a 2xx response.
///
/// Decoding is left to the caller.
///
/// # Errors
///
/// - [`ModelSyncError::Timeout`] / [`ModelSyncError::Network`] on transport failure
/// - [`ModelSyncError::ProviderApiError`] on a non-2xx status
pub async fn send_for_body(
    request: RequestBuilder,
    provider: &str,
    timeout: Duration,
) -> Result<String> {
    let response = request
        .send()
        .await
        .map_err(|e| map_send_error(&e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(api_error(provider, status, &body));
    }

    response.text().await.map_err(|e| map_send_error(&e, timeout))
}

/// Send a request and return only its status; the body is discarded.
///
/// # Errors
///
/// Returns [`ModelSyncError::Timeout`] / [`ModelSyncError::Network`] when no
/// response arrives.
pub async fn send_for_status(request: RequestBuilder, timeout: Duration) -> Result<StatusCode> {
    request
        .send()
        .await
        .map(|response| response.status())
        .map_err(|e| map_send_error(&e, timeout))
}

fn api_error(provider: &str, status: StatusCode, body: &str) -> ModelSyncError {
    let body = body.trim();
    let message = if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        body.chars().take(MAX_ERROR_BODY).collect()
    };
    ModelSyncError::ProviderApiError {
        provider: provider.to_string(),
        status_code: Some(status.as_u16()),
        message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_uses_reason_for_empty_body() {
        let err = api_error("openai", StatusCode::SERVICE_UNAVAILABLE, "  ");
        match err {
            ModelSyncError::ProviderApiError {
                status_code,
                message,
                ..
            } => {
                assert_eq!(status_code, Some(503));
                assert_eq!(message, "Service Unavailable");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn api_error_truncates_body() {
        let body = "x".repeat(1000);
        let err = api_error("groq", StatusCode::BAD_REQUEST, &body);
        let ModelSyncError::ProviderApiError { message, .. } = err else {
            panic!("wrong variant");
        };
        assert_eq!(message.len(), MAX_ERROR_BODY);
    }

    #[test]
    fn client_builds() {
        assert!(build_client(Duration::from_secs(5)).is_ok());
    }
}
