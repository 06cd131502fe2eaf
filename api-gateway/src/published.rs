// ==============================================================================
// published.rs - Article Timestamp Reshaping
// ==============================================================================
// Description: Converts upstream UTC timestamps to the +2h display format
// Author: Matt Barham
// Created: 2026-10-16
// Modified: 2026-10-16
// Version: 1.0.0
// ==============================================================================

use chrono::{Duration, NaiveDateTime};

/// Upstream timestamp layout (always UTC, second precision)
const UPSTREAM_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Display layout; the hour stays 24-hour and is followed by the AM/PM marker
const DISPLAY_FORMAT: &str = "%Y-%b-%d %H:%M%p";

/// Fixed display offset from UTC, in hours (SAST)
const DISPLAY_OFFSET_HOURS: i64 = 2;

/// Shift an upstream timestamp by the display offset and render it
///
/// Returns `None` when `raw` does not match the upstream layout.
pub fn to_display_time(raw: &str) -> Option<String> {
    let utc = NaiveDateTime::parse_from_str(raw, UPSTREAM_FORMAT).ok()?;
    let local = utc.checked_add_signed(Duration::hours(DISPLAY_OFFSET_HOURS))?;
    Some(local.format(DISPLAY_FORMAT).to_string())
}

/// Reshape `publishedAt`, passing malformed values through unchanged
pub fn reformat_published_at(raw: &str) -> String {
    to_display_time(raw).unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shifts_by_two_hours() {
        assert_eq!(reformat_published_at("2024-01-01T10:00:00Z"), "2024-Jan-01 12:00PM");
    }

    #[test]
    fn morning_times_use_am() {
        assert_eq!(reformat_published_at("2024-03-15T06:45:30Z"), "2024-Mar-15 08:45AM");
    }

    #[test]
    fn hour_stays_twenty_four_hour() {
        assert_eq!(reformat_published_at("2024-01-01T13:05:00Z"), "2024-Jan-01 15:05PM");
    }

    #[test]
    fn rolls_over_day_month_and_year() {
        assert_eq!(reformat_published_at("2024-12-31T23:30:00Z"), "2025-Jan-01 01:30AM");
        assert_eq!(reformat_published_at("2024-02-28T22:00:00Z"), "2024-Feb-29 00:00AM");
    }

    #[test]
    fn malformed_values_pass_through() {
        for raw in [
            "",
            "yesterday",
            "2024-01-01",
            "2024-01-01T10:00:00",
            "2024-01-01T10:00:00.123Z",
            "2024-01-01T10:00:00+02:00",
            "2024-13-01T10:00:00Z",
        ] {
            assert_eq!(reformat_published_at(raw), raw);
            assert!(to_display_time(raw).is_none());
        }
    }
}
