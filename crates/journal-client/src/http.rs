//! Typed HTTP client for the journal API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;
use uuid::Uuid;

use journal_core::{
    ChartEntry, ChartFilterParams, CreateChartRequest, CreateStrategyRequest, Error, Result,
    Strategy, UpdateChartRequest,
};

use crate::feed::ChartSource;
use crate::form::ChartApi;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Deserialize)]
struct ChartEnvelope {
    chart: ChartEntry,
}

/// Client for `/api/charts` and `/api/strategies`.
#[derive(Clone)]
pub struct JournalClient {
    client: Client,
    base_url: String,
}

impl JournalClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn list_charts(&self, params: &ChartFilterParams) -> Result<Vec<ChartEntry>> {
        let resp = self
            .client
            .get(self.url("/api/charts"))
            .query(params)
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn get_chart(&self, id: &str) -> Result<ChartEntry> {
        let resp = self
            .client
            .get(self.url("/api/charts"))
            .query(&[("id", id)])
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn create_chart(&self, req: &CreateChartRequest) -> Result<ChartEntry> {
        let resp = self
            .client
            .post(self.url("/api/charts"))
            .json(req)
            .send()
            .await?;
        let envelope: ChartEnvelope = read_json(resp).await?;
        Ok(envelope.chart)
    }

    pub async fn update_chart(&self, id: &str, req: &UpdateChartRequest) -> Result<ChartEntry> {
        let resp = self
            .client
            .put(self.url("/api/charts"))
            .query(&[("id", id)])
            .json(req)
            .send()
            .await?;
        let envelope: ChartEnvelope = read_json(resp).await?;
        Ok(envelope.chart)
    }

    pub async fn delete_chart(&self, id: &str) -> Result<()> {
        let resp = self
            .client
            .delete(self.url("/api/charts"))
            .query(&[("id", id)])
            .send()
            .await?;
        let _: serde_json::Value = read_json(resp).await?;
        debug!(subsystem = "client", component = "http", chart_id = %id, "Chart deleted");
        Ok(())
    }

    pub async fn list_strategies(&self) -> Result<Vec<Strategy>> {
        let resp = self.client.get(self.url("/api/strategies")).send().await?;
        read_json(resp).await
    }

    pub async fn create_strategy(&self, req: &CreateStrategyRequest) -> Result<Strategy> {
        let resp = self
            .client
            .post(self.url("/api/strategies"))
            .json(req)
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn update_strategy(&self, id: Uuid, value: &str, label: &str) -> Result<Strategy> {
        let resp = self
            .client
            .put(self.url("/api/strategies"))
            .json(&json!({ "id": id, "value": value, "label": label }))
            .send()
            .await?;
        read_json(resp).await
    }

    pub async fn delete_strategy(&self, id: Uuid) -> Result<()> {
        let resp = self
            .client
            .delete(self.url("/api/strategies"))
            .query(&[("id", id.to_string())])
            .send()
            .await?;
        let _: serde_json::Value = read_json(resp).await?;
        Ok(())
    }
}

/// Decode a success body, or map the `{"error": ..}` body to an error.
async fn read_json<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .unwrap_or(text);
    Err(match status {
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::BAD_REQUEST => Error::InvalidInput(message),
        _ => Error::Request(format!("{}: {}", status, message)),
    })
}

#[async_trait]
impl ChartSource for JournalClient {
    async fn fetch_charts(&self, params: &ChartFilterParams) -> Result<Vec<ChartEntry>> {
        self.list_charts(params).await
    }
}

#[async_trait]
impl ChartApi for JournalClient {
    async fn create_chart(&self, req: CreateChartRequest) -> Result<ChartEntry> {
        JournalClient::create_chart(self, &req).await
    }
}
