//! Date helpers for listing presets and timeline grouping.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate, Utc};

use journal_core::dates::{parse_date, DATE_FORMAT};
use journal_core::{ChartEntry, DateRange};

/// Range covering the last `n` days up to and including today (UTC).
pub fn last_n_days(n: u32) -> DateRange {
    last_n_days_from(Utc::now().date_naive(), n)
}

/// Range covering `n` days back from `today` through `today`.
pub fn last_n_days_from(today: NaiveDate, n: u32) -> DateRange {
    let start = today
        .checked_sub_days(Days::new(u64::from(n)))
        .unwrap_or(NaiveDate::MIN);
    DateRange {
        start: start.format(DATE_FORMAT).to_string(),
        end: today.format(DATE_FORMAT).to_string(),
    }
}

/// Bucket entries by calendar day, keyed `YYYY-MM-DD`, newest day first.
/// Order within a day is preserved.
pub fn group_by_date(entries: &[ChartEntry]) -> Vec<(String, Vec<&ChartEntry>)> {
    let mut groups: BTreeMap<String, Vec<&ChartEntry>> = BTreeMap::new();
    for entry in entries {
        let day = entry.date.get(..10).unwrap_or(entry.date.as_str()).to_string();
        groups.entry(day).or_default().push(entry);
    }
    groups.into_iter().rev().collect()
}

/// Display form such as `Mar 15, 2024`; falls back to the raw input.
pub fn display_date(date: &str) -> String {
    parse_date(date)
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| date.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use journal_core::{Execution, MarketCap};

    fn entry(id: &str, date: &str) -> ChartEntry {
        ChartEntry {
            id: id.to_string(),
            chart_name: id.to_string(),
            stock_symbol: "SPY".to_string(),
            date: date.to_string(),
            image_urls: vec!["https://utfs.io/f/x".to_string()],
            strategy: "gap".to_string(),
            execution: Execution::NotExecuted,
            market_cap: MarketCap::LargeCap,
            tags: vec![],
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_last_n_days_spans_month_boundary() {
        let today = NaiveDate::from_ymd_opt(2024, 3, 3).unwrap();
        let range = last_n_days_from(today, 7);
        assert_eq!(range.start, "2024-02-25");
        assert_eq!(range.end, "2024-03-03");
        assert!(range.contains("2024-02-29"));
    }

    #[test]
    fn test_last_zero_days_is_today() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let range = last_n_days_from(today, 0);
        assert_eq!(range.start, range.end);
    }

    #[test]
    fn test_group_by_date_newest_first() {
        let entries = vec![
            entry("a", "2024-03-14"),
            entry("b", "2024-03-15"),
            entry("c", "2024-03-14"),
        ];
        let groups = group_by_date(&entries);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "2024-03-15");
        let ids: Vec<&str> = groups[1].1.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_display_date() {
        assert_eq!(display_date("2024-03-05"), "Mar 5, 2024");
        assert_eq!(display_date("garbage"), "garbage");
    }
}
