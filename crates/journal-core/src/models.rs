//! Core data models for the trading journal.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dates::{normalize_date, today_string};
use crate::defaults;
use crate::error::{Error, Result};

// =============================================================================
// ENUMERATIONS
// =============================================================================

/// Whether the charted setup was actually traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Execution {
    Executed,
    #[default]
    NotExecuted,
}

impl Execution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Execution::Executed => "executed",
            Execution::NotExecuted => "not_executed",
        }
    }
}

impl fmt::Display for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Execution {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "executed" => Ok(Execution::Executed),
            "not_executed" => Ok(Execution::NotExecuted),
            other => Err(Error::InvalidInput(format!(
                "Unknown execution '{}'. Expected 'executed' or 'not_executed'",
                other
            ))),
        }
    }
}

/// Market capitalization bucket of the charted symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketCap {
    SmallCap,
    #[default]
    LargeCap,
}

impl MarketCap {
    pub fn as_str(&self) -> &'static str {
        match self {
            MarketCap::SmallCap => "small_cap",
            MarketCap::LargeCap => "large_cap",
        }
    }
}

impl fmt::Display for MarketCap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarketCap {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "small_cap" => Ok(MarketCap::SmallCap),
            "large_cap" => Ok(MarketCap::LargeCap),
            other => Err(Error::InvalidInput(format!(
                "Unknown market cap '{}'. Expected 'small_cap' or 'large_cap'",
                other
            ))),
        }
    }
}

// =============================================================================
// CHART ENTRY
// =============================================================================

/// A journaled chart with its annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartEntry {
    pub id: String,
    pub chart_name: String,
    pub stock_symbol: String,
    /// Calendar date, always `YYYY-MM-DD`.
    pub date: String,
    /// Display order is significant.
    pub image_urls: Vec<String>,
    /// Soft reference to `Strategy::value`.
    pub strategy: String,
    pub execution: Execution,
    pub market_cap: MarketCap,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChartEntry {
    /// Merge a normalized partial update into this entry and bump `updated_at`.
    ///
    /// Callers pass the result of [`UpdateChartRequest::normalized`].
    pub fn apply_update(&mut self, update: UpdateChartRequest, now: DateTime<Utc>) {
        if let Some(v) = update.chart_name {
            self.chart_name = v;
        }
        if let Some(v) = update.stock_symbol {
            self.stock_symbol = v;
        }
        if let Some(v) = update.date {
            self.date = v;
        }
        if let Some(v) = update.image_urls {
            self.image_urls = v;
        }
        if let Some(url) = update.image_url {
            self.image_urls.push(url);
        }
        if let Some(v) = update.strategy {
            self.strategy = v;
        }
        if let Some(v) = update.execution {
            self.execution = v;
        }
        if let Some(v) = update.market_cap {
            self.market_cap = v;
        }
        if let Some(v) = update.tags {
            self.tags = v;
        }
        if let Some(v) = update.notes {
            self.notes = Some(v);
        }
        self.updated_at = now;
    }
}

/// Draft of a chart entry as posted by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateChartRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub chart_name: String,
    #[serde(default)]
    pub stock_symbol: String,
    /// Any ISO 8601 date or datetime; defaults to today when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    /// Single-image form accepted from older clients; appended to `image_urls`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<Execution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<MarketCap>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CreateChartRequest {
    /// Validate the draft and build the entry to persist.
    ///
    /// Assigns `created_at`/`updated_at` to `now` and normalizes `date`.
    pub fn into_entry(self, now: DateTime<Utc>) -> Result<ChartEntry> {
        let mut image_urls: Vec<String> = self
            .image_urls
            .into_iter()
            .filter(|u| !u.trim().is_empty())
            .collect();
        if let Some(url) = self.image_url.filter(|u| !u.trim().is_empty()) {
            image_urls.push(url);
        }

        let mut missing = Vec::new();
        if self.id.trim().is_empty() {
            missing.push("id");
        }
        if self.chart_name.trim().is_empty() {
            missing.push("chartName");
        }
        if self.stock_symbol.trim().is_empty() {
            missing.push("stockSymbol");
        }
        if image_urls.is_empty() {
            missing.push("imageUrls");
        }
        if !missing.is_empty() {
            return Err(Error::InvalidInput(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let date = match self.date.as_deref().filter(|d| !d.trim().is_empty()) {
            Some(raw) => normalize_date(raw)
                .ok_or_else(|| Error::InvalidInput(format!("Invalid date '{}'", raw)))?,
            None => today_string(),
        };

        Ok(ChartEntry {
            id: self.id,
            chart_name: self.chart_name,
            stock_symbol: self.stock_symbol,
            date,
            image_urls,
            strategy: self
                .strategy
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| defaults::DEFAULT_STRATEGY.to_string()),
            execution: self.execution.unwrap_or_default(),
            market_cap: self.market_cap.unwrap_or_default(),
            tags: self.tags,
            notes: self.notes,
            created_at: now,
            updated_at: now,
        })
    }
}

/// Partial update of a chart entry. `id` and `createdAt` are never updatable
/// and are ignored if present in the payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChartRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution: Option<Execution>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_cap: Option<MarketCap>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl UpdateChartRequest {
    /// Normalize the date, fold the legacy `image_url` into an explicit
    /// `image_urls` list, and reject updates that would blank a required field.
    pub fn normalized(mut self) -> Result<Self> {
        if let Some(raw) = self.date.take() {
            let date = normalize_date(&raw)
                .ok_or_else(|| Error::InvalidInput(format!("Invalid date '{}'", raw)))?;
            self.date = Some(date);
        }

        // With an explicit list the legacy URL joins it; on its own it is
        // kept aside and appended to the stored list.
        let legacy = self.image_url.take().filter(|u| !u.trim().is_empty());
        match (self.image_urls.as_mut(), legacy) {
            (Some(urls), Some(url)) => urls.push(url),
            (None, Some(url)) => self.image_url = Some(url),
            (_, None) => {}
        }
        if let Some(urls) = self.image_urls.as_mut() {
            urls.retain(|u| !u.trim().is_empty());
            if urls.is_empty() {
                return Err(Error::InvalidInput(
                    "imageUrls must contain at least one image".to_string(),
                ));
            }
        }

        if self.chart_name.as_deref().is_some_and(|v| v.trim().is_empty()) {
            return Err(Error::InvalidInput("chartName cannot be empty".to_string()));
        }
        if self
            .stock_symbol
            .as_deref()
            .is_some_and(|v| v.trim().is_empty())
        {
            return Err(Error::InvalidInput(
                "stockSymbol cannot be empty".to_string(),
            ));
        }
        Ok(self)
    }
}

// =============================================================================
// STRATEGY
// =============================================================================

/// A selectable trading strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Strategy {
    pub id: Uuid,
    pub value: String,
    pub label: String,
}

impl Strategy {
    /// Display label for a chart's strategy value.
    ///
    /// Charts reference strategies by value without integrity checks, so a
    /// deleted or renamed strategy falls back to the raw value.
    pub fn label_for<'a>(strategies: &'a [Strategy], value: &'a str) -> &'a str {
        strategies
            .iter()
            .find(|s| s.value == value)
            .map(|s| s.label.as_str())
            .unwrap_or(value)
    }
}

/// Request body for creating a strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateStrategyRequest {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub label: String,
}

impl CreateStrategyRequest {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.value.trim().is_empty() || self.label.trim().is_empty() {
            return Err(Error::InvalidInput(
                "Value and label are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Validate, then trim both fields so padded values cannot shadow
    /// existing ones.
    pub fn normalized(self) -> Result<Self> {
        self.validate()?;
        Ok(Self {
            value: self.value.trim().to_string(),
            label: self.label.trim().to_string(),
        })
    }
}

/// Request body for updating a strategy.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateStrategyRequest {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub label: String,
}

impl UpdateStrategyRequest {
    /// Check required fields and parse the id.
    pub fn validate(&self) -> Result<Uuid> {
        if self.id.trim().is_empty() || self.value.trim().is_empty() || self.label.trim().is_empty()
        {
            return Err(Error::InvalidInput(
                "Id, value, and label are required".to_string(),
            ));
        }
        Uuid::parse_str(self.id.trim())
            .map_err(|_| Error::InvalidInput(format!("Invalid strategy id '{}'", self.id)))
    }
}
