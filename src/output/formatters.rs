//! Reusable formatting utilities for CLI output
//!
//! Timestamps and remaining lifetimes shown by `status` and the pretty
//! record views.

use chrono::{DateTime, Local, TimeDelta, Utc};

/// Format a UTC timestamp as local date/time.
///
/// # Example output
/// `2025-01-15 14:30 +01:00`
pub fn format_datetime_local(dt: DateTime<Utc>) -> String {
    dt.with_timezone(&Local).format("%Y-%m-%d %H:%M %:z").to_string()
}

/// Format an ISO 8601 string as local date/time, passing unparseable input through.
pub fn format_iso_local(timestamp: &str) -> String {
    match timestamp.parse::<DateTime<Utc>>() {
        Ok(dt) => format_datetime_local(dt),
        Err(_) => timestamp.to_string(),
    }
}

/// Format a duration as a compact human-readable string.
///
/// # Example output
/// - `2h 15m` (hours, minutes)
/// - `5m 10s` (minutes, seconds)
/// - `45s` (seconds only)
pub fn format_duration(delta: TimeDelta) -> String {
    let secs = delta.num_seconds().unsigned_abs();
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let secs = secs % 60;

    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else if mins > 0 {
        format!("{}m {}s", mins, secs)
    } else {
        format!("{}s", secs)
    }
}

/// Describe an expiry relative to `now`: `expires in 4m 10s` or `expired 3m 0s ago`.
pub fn format_expiry(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = expires_at.signed_duration_since(now);
    if remaining > TimeDelta::zero() {
        format!("expires in {}", format_duration(remaining))
    } else {
        format!("expired {} ago", format_duration(remaining))
    }
}

/// Render an optional value, `--` when absent or empty
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => "--".to_string(),
    }
}
