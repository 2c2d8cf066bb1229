//! Error rendering for the CLI.
//!
//! Human mode prints `error[CODE]: message` with an optional hint line;
//! JSON mode prints a structured object agents can branch on.

use colored::Colorize;
use serde::Serialize;

use crate::cli::args::OutputFormat;
use crate::error::ModelSyncError;

/// Render an error for stderr in the requested format.
#[must_use]
pub fn render_error(
    error: &ModelSyncError,
    format: OutputFormat,
    no_color: bool,
    pretty: bool,
) -> String {
    match format {
        OutputFormat::Json => render_error_json(error, pretty),
        OutputFormat::Human => render_simple(error, no_color),
    }
}

/// Render error as structured JSON for machine consumption.
#[must_use]
pub fn render_error_json(error: &ModelSyncError, pretty: bool) -> String {
    let error_json = ErrorJson::from_error(error);
    let rendered = if pretty {
        serde_json::to_string_pretty(&error_json)
    } else {
        serde_json::to_string(&error_json)
    };
    rendered.unwrap_or_else(|_| render_simple(error, true))
}

fn render_simple(error: &ModelSyncError, no_color: bool) -> String {
    let head = format!("error[{}]", error.error_code());
    let head = if no_color {
        head
    } else {
        head.red().bold().to_string()
    };

    let mut lines = vec![format!("{head}: {error}")];
    if let Some(hint) = error.hint() {
        let label = if no_color {
            "hint".to_string()
        } else {
            "hint".cyan().to_string()
        };
        lines.push(format!("  {label}: {hint}"));
    }
    lines.join("\n")
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorJson {
    error_code: &'static str,
    category: String,
    message: String,
    exit_code: i32,
    is_retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<String>,
}

impl ErrorJson {
    fn from_error(error: &ModelSyncError) -> Self {
        Self {
            error_code: error.error_code(),
            category: error.category().to_string(),
            message: error.to_string(),
            exit_code: error.exit_code().into(),
            is_retryable: error.is_retryable(),
            provider: error.provider().map(String::from),
            hint: error.hint(),
        }
    }
}
