//! Reusable formatting utilities for CLI output
//!
//! Timestamps, ages and the provenance banner shown above cached results.

use chrono::{DateTime, Duration, Local, Utc};
use colored::Colorize;

use super::Provenance;

/// Format a sync timestamp (milliseconds since epoch) in local time.
///
/// Returns "never" for `None` and "N/A" for out-of-range values.
pub fn format_sync_ms(millis: Option<i64>) -> String {
    match millis {
        None => "never".to_string(),
        Some(ms) => DateTime::from_timestamp_millis(ms)
            .map(|dt| format_local(&dt))
            .unwrap_or_else(|| "N/A".to_string()),
    }
}

/// Format a UTC instant as `YYYY-MM-DD HH:MM` in local time
pub fn format_local(at: &DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Format an age as a short relative string.
///
/// # Example output
/// - `just now`
/// - `45s ago`
/// - `3m ago`
/// - `2h 5m ago`
/// - `4d ago`
pub fn format_age(age: Duration) -> String {
    let secs = age.num_seconds();
    if secs < 5 {
        return "just now".to_string();
    }

    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3600;
    let mins = (secs % 3600) / 60;

    if days > 0 {
        format!("{}d ago", days)
    } else if hours > 0 {
        format!("{}h {}m ago", hours, mins)
    } else if mins > 0 {
        format!("{}m ago", mins)
    } else {
        format!("{}s ago", secs)
    }
}

/// Colored one-line banner describing cached or degraded results.
///
/// Returns `None` for fresh network results.
pub fn provenance_banner(provenance: &Provenance, now: DateTime<Utc>) -> Option<String> {
    if !provenance.from_cache && provenance.error.is_none() {
        return None;
    }

    let age = provenance
        .synced_at
        .map(|at| format!(" (synced {})", format_age(now - at)))
        .unwrap_or_default();

    let mut banner = if provenance.offline {
        format!("{} showing cached data{}", "○ Offline:".yellow().bold(), age)
    } else if provenance.error.is_some() {
        format!("{} showing cached data{}", "⚠ Sync failed:".yellow().bold(), age)
    } else {
        format!("{} cached{}", "✓".green(), age.dimmed())
    };

    if let Some(error) = &provenance.error {
        banner.push_str(&format!("\n  {}", error.dimmed()));
    }

    Some(banner)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provenance(from_cache: bool, offline: bool, error: Option<&str>) -> Provenance {
        Provenance {
            from_cache,
            offline,
            error: error.map(str::to_string),
            synced_at: None,
        }
    }

    #[test]
    fn test_format_sync_ms_never() {
        assert_eq!(format_sync_ms(None), "never");
    }

    #[test]
    fn test_format_sync_ms_valid() {
        // 2025-01-15 12:00:00 UTC; local rendering keeps the year
        let result = format_sync_ms(Some(1_736_942_400_000));
        assert!(result.starts_with("2025-01-1"));
    }

    #[test]
    fn test_format_age_buckets() {
        assert_eq!(format_age(Duration::seconds(2)), "just now");
        assert_eq!(format_age(Duration::seconds(45)), "45s ago");
        assert_eq!(format_age(Duration::seconds(180)), "3m ago");
        assert_eq!(format_age(Duration::seconds(7500)), "2h 5m ago");
        assert_eq!(format_age(Duration::days(4)), "4d ago");
    }

    #[test]
    fn test_banner_absent_for_fresh_results() {
        assert!(provenance_banner(&provenance(false, false, None), Utc::now()).is_none());
    }

    #[test]
    fn test_banner_offline() {
        colored::control::set_override(false);
        let now = Utc::now();
        let mut p = provenance(true, true, None);
        p.synced_at = Some(now - Duration::minutes(3));

        let banner = provenance_banner(&p, now).unwrap();
        assert!(banner.contains("Offline"));
        assert!(banner.contains("3m ago"));
    }

    #[test]
    fn test_banner_includes_error() {
        colored::control::set_override(false);
        let banner =
            provenance_banner(&provenance(true, false, Some("Server error: 503")), Utc::now())
                .unwrap();
        assert!(banner.contains("Sync failed"));
        assert!(banner.contains("Server error: 503"));
    }
}
