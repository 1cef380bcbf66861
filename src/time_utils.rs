// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for calendar dates and timestamps.

use chrono::{DateTime, NaiveDate, Utc};

/// Calendar day format accepted in query strings and request bodies.
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// Server-evaluated "today" (UTC calendar date).
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Calendar date of a UTC timestamp.
pub fn day_of(timestamp: DateTime<Utc>) -> NaiveDate {
    timestamp.date_naive()
}

/// Parse a `YYYY-MM-DD` day.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DAY_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_day_accepts_iso_dates() {
        assert_eq!(
            parse_day("2024-05-01"),
            NaiveDate::from_ymd_opt(2024, 5, 1)
        );
        assert_eq!(
            parse_day(" 2024-12-31 "),
            NaiveDate::from_ymd_opt(2024, 12, 31)
        );
    }

    #[test]
    fn parse_day_rejects_other_shapes() {
        assert_eq!(parse_day("2024-13-01"), None);
        assert_eq!(parse_day("01/05/2024"), None);
        assert_eq!(parse_day("2024-05-01T10:00:00Z"), None);
        assert_eq!(parse_day(""), None);
    }

    #[test]
    fn day_of_truncates_to_calendar_date() {
        let ts = DateTime::parse_from_rfc3339("2024-05-01T23:59:59Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(day_of(ts), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
    }
}
