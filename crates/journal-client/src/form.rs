//! Chart creation form.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use journal_core::defaults::DEFAULT_STRATEGY;
use journal_core::{
    today_string, ChartEntry, CreateChartRequest, Error, Execution, MarketCap, Result,
};

use crate::upload::UploadSession;

/// Write side of the chart API used by the form.
#[async_trait]
pub trait ChartApi: Send + Sync {
    async fn create_chart(&self, req: CreateChartRequest) -> Result<ChartEntry>;
}

/// Split a comma-separated tag field, dropping blanks.
pub fn parse_tags(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

fn base36(mut n: u128) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Opaque chart id: random base36 followed by the creation time in base36.
pub fn generate_chart_id() -> String {
    let random = Uuid::new_v4().as_u128() & u128::from(u64::MAX);
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    format!("{}{}", base36(random), base36(millis))
}

#[derive(Debug)]
pub struct ChartForm {
    pub chart_name: String,
    pub stock_symbol: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub strategy: String,
    pub execution: Execution,
    pub market_cap: MarketCap,
    /// Comma-separated.
    pub tags: String,
    pub notes: String,
    pub uploads: UploadSession,
}

impl Default for ChartForm {
    fn default() -> Self {
        Self {
            chart_name: String::new(),
            stock_symbol: String::new(),
            date: today_string(),
            strategy: DEFAULT_STRATEGY.to_string(),
            execution: Execution::NotExecuted,
            market_cap: MarketCap::LargeCap,
            tags: String::new(),
            notes: String::new(),
            uploads: UploadSession::new(),
        }
    }
}

impl ChartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn can_submit(&self) -> bool {
        !self.uploads.image_urls().is_empty()
            && !self.chart_name.trim().is_empty()
            && !self.stock_symbol.trim().is_empty()
    }

    /// Build the request body under the given id.
    pub fn to_request(&self, id: String) -> CreateChartRequest {
        let notes = self.notes.trim();
        CreateChartRequest {
            id,
            chart_name: self.chart_name.trim().to_string(),
            stock_symbol: self.stock_symbol.trim().to_string(),
            date: Some(self.date.clone()),
            image_urls: self.uploads.image_urls().to_vec(),
            image_url: None,
            strategy: Some(self.strategy.clone()),
            execution: Some(self.execution),
            market_cap: Some(self.market_cap),
            tags: parse_tags(&self.tags),
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        }
    }

    /// Post the form. Resets to defaults on success; keeps every field on
    /// failure so the user can retry.
    pub async fn submit(&mut self, api: &dyn ChartApi) -> Result<ChartEntry> {
        if !self.can_submit() {
            return Err(Error::InvalidInput(
                "Chart name, stock symbol and at least one image are required".to_string(),
            ));
        }
        let req = self.to_request(generate_chart_id());
        match api.create_chart(req).await {
            Ok(chart) => {
                info!(
                    subsystem = "client",
                    component = "form",
                    chart_id = %chart.id,
                    "Chart saved"
                );
                *self = Self::default();
                Ok(chart)
            }
            Err(e) => {
                warn!(subsystem = "client", component = "form", error = %e, "Chart save failed");
                Err(e)
            }
        }
    }
}
