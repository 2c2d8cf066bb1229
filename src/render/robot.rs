//! Robot-mode output (JSON).
//!
//! Every command wraps its payload in [`RobotOutput`] so agents can rely on
//! one envelope shape.

use serde::Serialize;

use crate::core::models::RobotOutput;
use crate::error::Result;

/// Render any serializable value as JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json<T: Serialize>(output: &T) -> Result<String> {
    Ok(serde_json::to_string(output)?)
}

/// Render any serializable value as pretty JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_json_pretty<T: Serialize>(output: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}

/// Wrap `data` in the robot envelope for `command` and render it.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn render_envelope<T: Serialize>(
    command: &str,
    data: T,
    errors: Vec<String>,
    pretty: bool,
) -> Result<String> {
    let output = RobotOutput::with_errors(command, data, errors);
    if pretty {
        render_json_pretty(&output)
    } else {
        render_json(&output)
    }
}
