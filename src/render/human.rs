//! Human-readable output using `colored`.
//!
//! Columns are padded on the plain text before styling so ANSI codes never
//! disturb alignment.

use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};

use crate::core::filter::Page;
use crate::core::models::{KeySummary, Model, ProviderSummary};
use crate::core::sync::{RefreshOutcome, RefreshReport, VerificationReport};
use crate::storage::CacheStatus;
use crate::util::{format_age_hours, format_cost, format_relative_time, format_tokens};

/// Apply `style` unless color is disabled.
fn paint(text: &str, no_color: bool, style: impl Fn(ColoredString) -> ColoredString) -> String {
    if no_color {
        text.to_string()
    } else {
        style(text.normal()).to_string()
    }
}

fn header(text: &str, no_color: bool) -> String {
    paint(text, no_color, |s| s.bold().cyan())
}

fn dim(text: &str, no_color: bool) -> String {
    paint(text, no_color, ColoredString::dimmed)
}

fn yes_no(value: bool, no_color: bool) -> String {
    if value {
        paint("yes", no_color, ColoredString::green)
    } else {
        dim("no", no_color)
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

// =============================================================================
// Providers & Keys
// =============================================================================

/// Render the provider registry with key status.
#[must_use]
pub fn render_providers(providers: &[ProviderSummary], no_color: bool) -> String {
    let mut lines = vec![header(
        &format!("{:<12} {:<22} {:<6} {:<9}", "ID", "NAME", "KEY", "VERIFIED"),
        no_color,
    )];

    for p in providers {
        let key = match (p.requires_api_key, p.has_key) {
            (false, _) => dim(&format!("{:<6}", "n/a"), no_color),
            (true, true) => paint(&format!("{:<6}", "yes"), no_color, ColoredString::green),
            (true, false) => dim(&format!("{:<6}", "no"), no_color),
        };
        let mut line = format!(
            "{:<12} {:<22} {key} {}",
            p.id,
            truncate(&p.name, 22),
            yes_no(p.key_verified, no_color),
        );
        if p.custom {
            line.push_str(&format!(" {}", dim("(custom)", no_color)));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Render stored keys (already masked).
#[must_use]
pub fn render_keys(keys: &[KeySummary], now: DateTime<Utc>, no_color: bool) -> String {
    if keys.is_empty() {
        return "No API keys stored. Add one with: modelsync keys add <provider> <key>".to_string();
    }

    let mut lines = vec![header(
        &format!(
            "{:<12} {:<16} {:<9} {}",
            "PROVIDER", "KEY", "VERIFIED", "ADDED"
        ),
        no_color,
    )];
    for key in keys {
        let verified = if key.is_verified {
            paint(&format!("{:<9}", "yes"), no_color, ColoredString::green)
        } else {
            paint(&format!("{:<9}", "no"), no_color, ColoredString::yellow)
        };
        lines.push(format!(
            "{:<12} {:<16} {verified} {}",
            key.provider,
            key.masked_key,
            format_relative_time(key.added_at, now),
        ));
    }
    lines.join("\n")
}

/// Render a verification result.
#[must_use]
pub fn render_verification(report: &VerificationReport, no_color: bool) -> String {
    if report.verified {
        format!("{} {}", paint("✓", no_color, ColoredString::green), report.message)
    } else {
        format!("{} {}", paint("✗", no_color, ColoredString::red), report.message)
    }
}

// =============================================================================
// Models
// =============================================================================

fn capabilities_cell(model: &Model) -> String {
    model
        .capabilities
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|c| c.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

fn cost_cell(cost: Option<f64>) -> String {
    cost.map_or_else(|| "-".to_string(), format_cost)
}

/// Render one page of models as a table with a paging footer.
#[must_use]
pub fn render_models(page: &Page, no_color: bool) -> String {
    if page.total == 0 {
        return "No models match.".to_string();
    }

    let mut lines = vec![header(
        &format!(
            "{:<40} {:<11} {:>8} {:>9} {:>9}  {}",
            "MODEL", "PROVIDER", "CONTEXT", "IN $/M", "OUT $/M", "CAPABILITIES"
        ),
        no_color,
    )];

    for model in &page.items {
        let id = format!("{:<40}", truncate(&model.id, 40));
        let id = if model.is_deprecated() {
            dim(&id, no_color)
        } else {
            paint(&id, no_color, ColoredString::bold)
        };
        lines.push(format!(
            "{id} {:<11} {:>8} {:>9} {:>9}  {}",
            truncate(&model.provider, 11),
            model
                .context_length
                .map_or_else(|| "-".to_string(), format_tokens),
            cost_cell(model.input_cost_per_million),
            cost_cell(model.output_cost_per_million),
            dim(&capabilities_cell(model), no_color),
        ));
    }

    lines.push(String::new());
    lines.push(dim(
        &format!(
            "Page {}/{} ({} model{})",
            page.page,
            page.total_pages.max(1),
            page.total,
            if page.total == 1 { "" } else { "s" }
        ),
        no_color,
    ));
    lines.join("\n")
}

// =============================================================================
// Refresh & Cache
// =============================================================================

/// Render the per-provider outcome of a batch refresh.
#[must_use]
pub fn render_refresh(report: &RefreshReport, no_color: bool) -> String {
    let mut lines = Vec::with_capacity(report.providers.len() + 2);
    for entry in &report.providers {
        let status = match &entry.outcome {
            RefreshOutcome::Refreshed { count } => paint(
                &format!("refreshed {count} model{}", if *count == 1 { "" } else { "s" }),
                no_color,
                ColoredString::green,
            ),
            RefreshOutcome::UpToDate => dim("up to date", no_color),
            RefreshOutcome::SkippedNoCredential => {
                paint("skipped (no API key)", no_color, ColoredString::yellow)
            }
            RefreshOutcome::Failed { error } => {
                paint(&format!("failed: {error}"), no_color, ColoredString::red)
            }
        };
        lines.push(format!("{:<12} {status}", entry.provider));
    }

    lines.push(String::new());
    lines.push(format!(
        "{} refreshed, {} skipped, {} failed",
        report.refreshed().len(),
        report.skipped().len(),
        report.failed().len()
    ));
    lines.join("\n")
}

/// Render cache freshness per provider.
#[must_use]
pub fn render_cache_status(status: &[CacheStatus], no_color: bool) -> String {
    if status.is_empty() {
        return "Model cache is empty. Seed it with: modelsync cache init".to_string();
    }

    let mut lines = vec![header(
        &format!("{:<12} {:>7} {:>9}  {}", "PROVIDER", "MODELS", "AGE", "STATE"),
        no_color,
    )];
    for row in status {
        let state = if row.fresh {
            paint("fresh", no_color, ColoredString::green)
        } else {
            paint("stale", no_color, ColoredString::yellow)
        };
        lines.push(format!(
            "{:<12} {:>7} {:>9}  {state}",
            row.provider,
            row.model_count,
            format_age_hours(row.age_hours),
        ));
    }
    lines.join("\n")
}
