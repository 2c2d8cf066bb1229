//! modelsync - AI provider credentials and a TTL-cached model catalog.
//!
//! Stores provider API keys, keeps a 24-hour cache of each provider's model
//! list seeded from built-in defaults, and refreshes it from the providers'
//! model-listing endpoints on demand.

#![deny(unsafe_code)]
#![warn(clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod cli;
pub mod core;
pub mod error;
pub mod providers;
pub mod render;
pub mod storage;
pub mod util;

/// Test utilities module - included in test builds or when test-utils feature is enabled.
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{ExitCode, ModelSyncError, Result};

// Re-export test utilities for external test crates
#[cfg(any(test, feature = "test-utils"))]
pub use test_utils::*;
