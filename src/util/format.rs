//! Number and key formatting utilities.

/// Format a per-million-token price in USD.
///
/// Sub-cent prices keep enough precision to stay distinguishable.
#[must_use]
pub fn format_cost(value: f64) -> String {
    if value == 0.0 {
        "free".to_string()
    } else if value < 0.01 {
        format!("${value:.4}")
    } else {
        format!("${value:.2}")
    }
}

/// Format a token count compactly (`128K`, `1.0M`).
#[must_use]
pub fn format_tokens(value: u64) -> String {
    fn format_compact(value: u64, divisor: u64, suffix: &str) -> String {
        let major = value / divisor;
        let minor = (value % divisor) / (divisor / 10);
        if minor == 0 && suffix == "K" {
            format!("{major}{suffix}")
        } else {
            format!("{major}.{minor}{suffix}")
        }
    }

    if value >= 1_000_000 {
        format_compact(value, 1_000_000, "M")
    } else if value >= 1_000 {
        format_compact(value, 1_000, "K")
    } else {
        value.to_string()
    }
}

/// Mask an API key for display, keeping a short prefix and suffix.
#[must_use]
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len().max(4));
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
