//! Chart listing filters.
//!
//! [`ChartFilterParams`] is the raw query surface; [`ChartPredicate`] is the
//! composed constraint set. Every present constraint is ANDed; the text search
//! is an OR across `chartName` and `stockSymbol`. The same predicate is
//! evaluated in memory by [`ChartPredicate::matches`] and rendered to SQL by
//! the database crate.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::DateRange;
use crate::defaults::FILTER_ALL;
use crate::models::ChartEntry;

/// Optional filter values as they arrive on the listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartFilterParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl ChartFilterParams {
    /// Compose the predicate.
    ///
    /// A date range is applied only when both bounds are present and
    /// parseable; otherwise date filtering is silently skipped.
    pub fn to_predicate(&self) -> ChartPredicate {
        let date_range =
            DateRange::from_bounds(self.start_date.as_deref(), self.end_date.as_deref());
        if date_range.is_none() && (self.start_date.is_some() || self.end_date.is_some()) {
            debug!(
                subsystem = "core",
                component = "filter",
                start_date = ?self.start_date,
                end_date = ?self.end_date,
                "Incomplete or malformed date range, date filter skipped"
            );
        }

        ChartPredicate {
            search: self
                .search
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from),
            strategy: exact(self.strategy.as_deref()),
            market_cap: exact(self.market_cap.as_deref()),
            execution: exact(self.execution.as_deref()),
            date_range,
        }
    }
}

fn exact(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.is_empty() && *v != FILTER_ALL)
        .map(String::from)
}

/// Conjunction of the constraints that are actually present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChartPredicate {
    /// Case-insensitive substring matched against chart name OR symbol.
    pub search: Option<String>,
    pub strategy: Option<String>,
    pub market_cap: Option<String>,
    pub execution: Option<String>,
    pub date_range: Option<DateRange>,
}

impl ChartPredicate {
    /// Predicate that matches every chart.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unconstrained(&self) -> bool {
        self == &Self::default()
    }

    /// Evaluate the predicate against a single entry.
    pub fn matches(&self, entry: &ChartEntry) -> bool {
        if let Some(needle) = &self.search {
            let needle = needle.to_lowercase();
            let hit = entry.chart_name.to_lowercase().contains(&needle)
                || entry.stock_symbol.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        if let Some(strategy) = &self.strategy {
            if &entry.strategy != strategy {
                return false;
            }
        }
        if let Some(market_cap) = &self.market_cap {
            if entry.market_cap.as_str() != market_cap {
                return false;
            }
        }
        if let Some(execution) = &self.execution {
            if entry.execution.as_str() != execution {
                return false;
            }
        }
        if let Some(range) = &self.date_range {
            if !range.contains(&entry.date) {
                return false;
            }
        }
        true
    }
}
