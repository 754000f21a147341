//! Listing filter state held by the client.
//!
//! Every setter returns `true` only when the stored value actually changed,
//! so callers forward a filter snapshot to the feed only on real edits.

use journal_core::defaults::FILTER_ALL;
use journal_core::{normalize_date, ChartFilterParams};

/// Current listing filters. Enumerated fields default to `all`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    search: String,
    strategy: String,
    market_cap: String,
    execution: String,
    start_date: Option<String>,
    end_date: Option<String>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search: String::new(),
            strategy: FILTER_ALL.to_string(),
            market_cap: FILTER_ALL.to_string(),
            execution: FILTER_ALL.to_string(),
            start_date: None,
            end_date: None,
        }
    }
}

fn replace(slot: &mut String, value: &str) -> bool {
    if slot == value {
        return false;
    }
    *slot = value.to_string();
    true
}

fn enumerated(value: &str) -> &str {
    if value.is_empty() {
        FILTER_ALL
    } else {
        value
    }
}

impl FilterState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    pub fn market_cap(&self) -> &str {
        &self.market_cap
    }

    pub fn execution(&self) -> &str {
        &self.execution
    }

    pub fn start_date(&self) -> Option<&str> {
        self.start_date.as_deref()
    }

    pub fn end_date(&self) -> Option<&str> {
        self.end_date.as_deref()
    }

    pub fn set_search(&mut self, value: &str) -> bool {
        replace(&mut self.search, value)
    }

    pub fn set_strategy(&mut self, value: &str) -> bool {
        replace(&mut self.strategy, enumerated(value))
    }

    pub fn set_market_cap(&mut self, value: &str) -> bool {
        replace(&mut self.market_cap, enumerated(value))
    }

    pub fn set_execution(&mut self, value: &str) -> bool {
        replace(&mut self.execution, enumerated(value))
    }

    /// Set the lower date bound.
    ///
    /// Unparseable input is ignored. A start after the current end drags the
    /// end forward to the same day.
    pub fn set_start_date(&mut self, value: &str) -> bool {
        let Some(date) = normalize_date(value) else {
            return false;
        };
        let mut changed = self.start_date.as_deref() != Some(date.as_str());
        if self.end_date.as_deref().is_some_and(|end| end < date.as_str()) {
            self.end_date = Some(date.clone());
            changed = true;
        }
        self.start_date = Some(date);
        changed
    }

    /// Set the upper date bound.
    ///
    /// Unparseable input is ignored. An end before the current start drags
    /// the start back to the same day.
    pub fn set_end_date(&mut self, value: &str) -> bool {
        let Some(date) = normalize_date(value) else {
            return false;
        };
        let mut changed = self.end_date.as_deref() != Some(date.as_str());
        if self
            .start_date
            .as_deref()
            .is_some_and(|start| start > date.as_str())
        {
            self.start_date = Some(date.clone());
            changed = true;
        }
        self.end_date = Some(date);
        changed
    }

    /// Apply both bounds at once, e.g. from a preset.
    pub fn set_date_range(&mut self, start: &str, end: &str) -> bool {
        let (Some(start), Some(end)) = (normalize_date(start), normalize_date(end)) else {
            return false;
        };
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let changed = self.start_date.as_deref() != Some(start.as_str())
            || self.end_date.as_deref() != Some(end.as_str());
        self.start_date = Some(start);
        self.end_date = Some(end);
        changed
    }

    pub fn clear_dates(&mut self) -> bool {
        let changed = self.start_date.is_some() || self.end_date.is_some();
        self.start_date = None;
        self.end_date = None;
        changed
    }

    /// True when any filter narrows the listing.
    pub fn is_filtered(&self) -> bool {
        !self.search.trim().is_empty()
            || self.strategy != FILTER_ALL
            || self.market_cap != FILTER_ALL
            || self.execution != FILTER_ALL
            || self.start_date.is_some()
            || self.end_date.is_some()
    }

    /// Restore every field to its default.
    pub fn reset(&mut self) -> bool {
        let fresh = Self::default();
        if *self == fresh {
            return false;
        }
        *self = fresh;
        true
    }

    /// Query parameters for the listing endpoint.
    ///
    /// Blank search and `all` sentinels are omitted. Dates are sent only as a
    /// complete pair.
    pub fn to_params(&self) -> ChartFilterParams {
        let search = self.search.trim();
        let narrowed = |v: &str| (v != FILTER_ALL).then(|| v.to_string());
        let (start_date, end_date) = match (&self.start_date, &self.end_date) {
            (Some(start), Some(end)) => (Some(start.clone()), Some(end.clone())),
            _ => (None, None),
        };
        ChartFilterParams {
            search: (!search.is_empty()).then(|| search.to_string()),
            strategy: narrowed(&self.strategy),
            market_cap: narrowed(&self.market_cap),
            execution: narrowed(&self.execution),
            start_date,
            end_date,
        }
    }
}
