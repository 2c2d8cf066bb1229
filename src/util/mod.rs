//! Utility functions.

pub mod env;
pub mod format;
pub mod time;

pub use format::{format_cost, format_tokens, mask_key};
pub use time::{format_age_hours, format_relative_time};
