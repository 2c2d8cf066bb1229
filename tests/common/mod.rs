//! Shared helpers for integration tests.
//!
//! - `logger`: per-test structured logging
//! - `log_capture`: assertions over tracing events emitted by the library

pub mod log_capture;
pub mod logger;
