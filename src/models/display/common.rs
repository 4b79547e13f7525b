//! Common display utilities and helpers

use crate::client::models::parse_day;

/// Placeholder for missing values
pub const EMPTY: &str = "-";

/// Truncate string to max characters with ellipsis
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Render a date or datetime as YYYY-MM-DD, falling back to the raw value
pub fn format_day(value: Option<&str>) -> String {
    match value {
        Some(v) => parse_day(v)
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| v.to_string()),
        None => EMPTY.to_string(),
    }
}

/// Member name, or the numeric ID when the roster entry carries no name
pub fn member_name(name: Option<&str>, user_id: i64) -> String {
    name.map(str::to_string)
        .unwrap_or_else(|| format!("member #{}", user_id))
}
