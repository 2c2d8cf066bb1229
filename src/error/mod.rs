//! Error types for modelsync.
//!
//! Uses `thiserror` for structured error types that map to exit codes.
//!
//! ## Error Taxonomy
//!
//! - **Authentication**: a provider needs a key and none is stored, or a key
//!   was rejected during verification
//! - **Network**: connection failures and timeouts talking to a provider
//! - **Configuration**: unknown provider ids, bad config files or values
//! - **Provider**: non-success API responses and unparseable bodies
//! - **Storage**: the local key/value store could not be read or written
//! - **Internal**: I/O, JSON and unclassified errors
//!
//! Each error has a stable error code (e.g., `MSYNC-A001`) for programmatic handling.
//!
//! Storage *corruption* never surfaces here: read paths in [`crate::storage`]
//! degrade to an empty state and log instead.

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// High-level error categories for classification and routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Missing or rejected credentials.
    Authentication,
    /// Connection failures and timeouts.
    Network,
    /// Unknown providers, invalid configuration.
    Configuration,
    /// Provider API errors.
    Provider,
    /// Local persisted store failures.
    Storage,
    /// Internal errors (bugs, unexpected state, unclassified).
    Internal,
}

impl ErrorCategory {
    /// Returns a human-readable description of the category.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::Authentication => "Authentication error",
            Self::Network => "Network error",
            Self::Configuration => "Configuration error",
            Self::Provider => "Provider error",
            Self::Storage => "Storage error",
            Self::Internal => "Internal error",
        }
    }

    /// Returns a short code prefix for this category.
    #[must_use]
    pub const fn code_prefix(&self) -> &'static str {
        match self {
            Self::Authentication => "A",
            Self::Network => "N",
            Self::Configuration => "C",
            Self::Provider => "P",
            Self::Storage => "S",
            Self::Internal => "X",
        }
    }
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

// =============================================================================
// Exit Codes
// =============================================================================

/// Process exit codes for the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Unexpected failure
    GeneralError = 1,
    /// Unknown provider, invalid config or arguments
    ConfigError = 2,
    /// Missing or rejected credentials
    AuthError = 3,
    /// Timeout
    Timeout = 4,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code as Self
    }
}

/// Main error type for modelsync operations.
#[derive(Error, Debug)]
pub enum ModelSyncError {
    // ==========================================================================
    // Authentication errors
    // ==========================================================================
    /// Provider requires an API key and none is stored.
    #[error("API key required for {provider}")]
    MissingCredential { provider: String },

    /// A key was rejected by the provider.
    #[error("verification failed for {provider}: {reason}")]
    VerificationFailed { provider: String, reason: String },

    // ==========================================================================
    // Network errors
    // ==========================================================================
    /// Request timeout.
    #[error("request timeout after {0} seconds")]
    Timeout(u64),

    /// Connection-level failure.
    #[error("network error: {0}")]
    Network(String),

    // ==========================================================================
    // Configuration errors
    // ==========================================================================
    /// The requested provider id is not in the registry.
    #[error("provider {provider} not found")]
    ProviderNotFound { provider: String },

    /// Error parsing a configuration file.
    #[error("config parse error at {path}: {message}")]
    ConfigParse { path: String, message: String },

    /// Invalid value in configuration.
    #[error("invalid config value for '{key}': {message}")]
    ConfigInvalid { key: String, message: String },

    /// Generic configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    // ==========================================================================
    // Provider errors
    // ==========================================================================
    /// Provider API returned a non-success status.
    #[error("provider {provider} API error: {message}")]
    ProviderApiError {
        provider: String,
        status_code: Option<u16>,
        message: String,
    },

    /// Provider response body could not be decoded.
    #[error("failed to parse response: {0}")]
    ParseResponse(String),

    /// Some providers in a batch failed.
    #[error("partial failure: {failed} provider(s) failed")]
    PartialFailure { failed: usize },

    // ==========================================================================
    // Storage errors
    // ==========================================================================
    /// The persisted store rejected an operation.
    #[error("storage error: {0}")]
    Storage(String),

    // ==========================================================================
    // Internal errors
    // ==========================================================================
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for other errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ModelSyncError {
    /// Map error to a process exit code.
    #[must_use]
    pub const fn exit_code(&self) -> ExitCode {
        match self {
            Self::ProviderNotFound { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::Config(_) => ExitCode::ConfigError,

            Self::MissingCredential { .. } | Self::VerificationFailed { .. } => ExitCode::AuthError,

            Self::Timeout(_) => ExitCode::Timeout,

            Self::Network(_)
            | Self::ProviderApiError { .. }
            | Self::ParseResponse(_)
            | Self::PartialFailure { .. }
            | Self::Storage(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Other(_) => ExitCode::GeneralError,
        }
    }

    /// Returns the error category for classification and routing.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingCredential { .. } | Self::VerificationFailed { .. } => {
                ErrorCategory::Authentication
            }

            Self::Timeout(_) | Self::Network(_) => ErrorCategory::Network,

            Self::ProviderNotFound { .. }
            | Self::ConfigParse { .. }
            | Self::ConfigInvalid { .. }
            | Self::Config(_) => ErrorCategory::Configuration,

            Self::ProviderApiError { .. } | Self::ParseResponse(_) | Self::PartialFailure { .. } => {
                ErrorCategory::Provider
            }

            Self::Storage(_) => ErrorCategory::Storage,

            Self::Io(_) | Self::Json(_) | Self::Other(_) => ErrorCategory::Internal,
        }
    }

    /// Returns a stable error code for programmatic handling.
    ///
    /// Format: `MSYNC-{category}{number}`.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MissingCredential { .. } => "MSYNC-A001",
            Self::VerificationFailed { .. } => "MSYNC-A002",

            Self::Timeout(_) => "MSYNC-N001",
            Self::Network(_) => "MSYNC-N099",

            Self::ProviderNotFound { .. } => "MSYNC-C001",
            Self::ConfigParse { .. } => "MSYNC-C002",
            Self::ConfigInvalid { .. } => "MSYNC-C003",
            Self::Config(_) => "MSYNC-C004",

            Self::ProviderApiError { .. } => "MSYNC-P001",
            Self::ParseResponse(_) => "MSYNC-P020",
            Self::PartialFailure { .. } => "MSYNC-P030",

            Self::Storage(_) => "MSYNC-S001",

            Self::Io(_) => "MSYNC-X001",
            Self::Json(_) => "MSYNC-X002",
            Self::Other(_) => "MSYNC-X099",
        }
    }

    /// Returns whether the error is potentially recoverable by retrying.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout(_) | Self::Network(_) => true,
            Self::ProviderApiError {
                status_code: Some(code),
                ..
            } => *code == 429 || *code >= 500,
            _ => false,
        }
    }

    /// Returns the provider id if this error is provider-specific.
    #[must_use]
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::MissingCredential { provider }
            | Self::VerificationFailed { provider, .. }
            | Self::ProviderNotFound { provider }
            | Self::ProviderApiError { provider, .. } => Some(provider),
            _ => None,
        }
    }

    /// One-line remediation hint for CLI output.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::MissingCredential { provider } => {
                Some(format!("Add a key with: modelsync keys add {provider} <API_KEY>"))
            }
            Self::VerificationFailed { provider, .. } => Some(format!(
                "Check the key in your {provider} dashboard, then run: modelsync keys add {provider} <API_KEY>"
            )),
            Self::ProviderNotFound { .. } => {
                Some("List known providers with: modelsync providers".to_string())
            }
            Self::ConfigParse { path, .. } => Some(format!("Fix or remove {path}")),
            Self::Timeout(_) => {
                Some("Retry with a larger --timeout or check your connection".to_string())
            }
            Self::ProviderApiError {
                status_code: Some(401 | 403),
                provider,
                ..
            } => Some(format!(
                "The stored key was rejected; run: modelsync keys verify {provider}"
            )),
            _ => None,
        }
    }
}

/// Result type alias for modelsync operations.
pub type Result<T> = std::result::Result<T, ModelSyncError>;

// =============================================================================
// Tests
// =============================================================================
