//! Calendar date normalization.
//!
//! Chart dates are stored as fixed-width `YYYY-MM-DD` strings so that
//! lexicographic comparison is equivalent to chronological comparison.
//! Inputs may carry a time-of-day and timezone; both are truncated, never
//! converted, so `2024-03-15T23:30:00-05:00` stays on the 15th.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Storage format for chart dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Normalize a date or datetime string to `YYYY-MM-DD`.
///
/// Returns `None` when the input is not a recognizable ISO 8601 date.
pub fn normalize_date(input: &str) -> Option<String> {
    parse_date(input).map(|d| d.format(DATE_FORMAT).to_string())
}

/// Parse the calendar date portion of an ISO 8601 date or datetime string.
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let s = input.trim();
    let head = s.get(..10)?;
    let date = NaiveDate::parse_from_str(head, DATE_FORMAT).ok()?;

    let rest = &s[10..];
    if rest.is_empty() {
        return Some(date);
    }

    // A trailing component must be a well-formed time, with or without offset.
    if DateTime::parse_from_rfc3339(s).is_ok() {
        return Some(date);
    }
    let without_z = s.strip_suffix('Z').unwrap_or(s);
    DATETIME_FORMATS
        .iter()
        .any(|fmt| NaiveDateTime::parse_from_str(without_z, fmt).is_ok())
        .then_some(date)
}

/// Today's date in UTC as `YYYY-MM-DD`.
pub fn today_string() -> String {
    Utc::now().date_naive().format(DATE_FORMAT).to_string()
}

/// An inclusive range of normalized `YYYY-MM-DD` dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: String,
    pub end: String,
}

impl DateRange {
    /// Build a range from raw bounds. Both must be present and parseable.
    pub fn from_bounds(start: Option<&str>, end: Option<&str>) -> Option<Self> {
        let start = normalize_date(start?)?;
        let end = normalize_date(end?)?;
        Some(Self { start, end })
    }

    /// Inclusive lexicographic containment check.
    pub fn contains(&self, date: &str) -> bool {
        self.start.as_str() <= date && date <= self.end.as_str()
    }
}
