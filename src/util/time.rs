//! Time formatting utilities.

use chrono::{DateTime, Utc};

/// Format a cache age given in fractional hours.
#[must_use]
pub fn format_age_hours(hours: f64) -> String {
    if hours < 0.0 {
        return "in the future".to_string();
    }
    if hours < 1.0 / 60.0 {
        return "just now".to_string();
    }
    if hours < 1.0 {
        return format!("{:.0}m", hours * 60.0);
    }
    if hours < 48.0 {
        return format!("{hours:.1}h");
    }
    format!("{:.0}d", hours / 24.0)
}

/// Format `target` relative to `now` (past or future).
#[must_use]
pub fn format_relative_time(target: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(target);

    if duration.num_seconds().abs() < 60 {
        return "just now".to_string();
    }

    let minutes = duration.num_minutes().abs();
    let hours = duration.num_hours().abs();
    let days = duration.num_days().abs();

    let suffix = if duration.num_seconds() > 0 {
        "ago"
    } else {
        "from now"
    };

    if days > 0 {
        format!("{days} day{} {suffix}", if days == 1 { "" } else { "s" })
    } else if hours > 0 {
        format!("{hours} hour{} {suffix}", if hours == 1 { "" } else { "s" })
    } else {
        format!(
            "{minutes} minute{} {suffix}",
            if minutes == 1 { "" } else { "s" }
        )
    }
}
