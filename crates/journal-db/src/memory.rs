//! In-process storage backend.
//!
//! Shares validation and normalization with the PostgreSQL repositories
//! through the request types in `journal-core`, so both backends accept and
//! reject the same inputs. Used when `STORE_BACKEND=memory` and by tests.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use journal_core::defaults::DEFAULT_STRATEGIES;
use journal_core::{
    new_v7, ChartEntry, ChartPredicate, ChartRepository, CreateChartRequest,
    CreateStrategyRequest, Error, Result, Strategy, StrategyRepository, UpdateChartRequest,
};

/// Chart entries held in a map keyed by id.
#[derive(Default)]
pub struct MemoryChartRepository {
    entries: RwLock<HashMap<String, ChartEntry>>,
}

impl MemoryChartRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ChartRepository for MemoryChartRepository {
    async fn list(&self, predicate: &ChartPredicate) -> Result<Vec<ChartEntry>> {
        let entries = self.entries.read().await;
        let mut charts: Vec<ChartEntry> = entries
            .values()
            .filter(|e| predicate.matches(e))
            .cloned()
            .collect();
        charts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        debug!(
            subsystem = "db",
            component = "memory_charts",
            op = "list",
            result_count = charts.len(),
            "Listed chart entries"
        );
        Ok(charts)
    }

    async fn fetch(&self, id: &str) -> Result<ChartEntry> {
        self.entries
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| Error::ChartNotFound(id.to_string()))
    }

    async fn insert(&self, req: CreateChartRequest) -> Result<ChartEntry> {
        let entry = req.into_entry(Utc::now())?;
        let mut entries = self.entries.write().await;
        if entries.contains_key(&entry.id) {
            return Err(Error::Conflict(format!(
                "Chart entry '{}' already exists",
                entry.id
            )));
        }
        entries.insert(entry.id.clone(), entry.clone());

        info!(
            subsystem = "db",
            component = "memory_charts",
            op = "insert",
            chart_id = %entry.id,
            "Chart entry inserted"
        );
        Ok(entry)
    }

    async fn update(&self, id: &str, req: UpdateChartRequest) -> Result<ChartEntry> {
        let req = req.normalized()?;
        let mut entries = self.entries.write().await;
        let entry = entries
            .get_mut(id)
            .ok_or_else(|| Error::ChartNotFound(id.to_string()))?;
        entry.apply_update(req, Utc::now());
        Ok(entry.clone())
    }

    async fn delete(&self, id: &str) -> Result<ChartEntry> {
        self.entries
            .write()
            .await
            .remove(id)
            .ok_or_else(|| Error::ChartNotFound(id.to_string()))
    }
}

/// Strategy registry held in insertion order.
#[derive(Default)]
pub struct MemoryStrategyRepository {
    strategies: RwLock<Vec<Strategy>>,
}

impl MemoryStrategyRepository {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the default taxonomy.
    pub fn with_defaults() -> Self {
        let strategies = DEFAULT_STRATEGIES
            .iter()
            .map(|(value, label)| Strategy {
                id: new_v7(),
                value: value.to_string(),
                label: label.to_string(),
            })
            .collect();
        Self {
            strategies: RwLock::new(strategies),
        }
    }
}

#[async_trait]
impl StrategyRepository for MemoryStrategyRepository {
    async fn list(&self) -> Result<Vec<Strategy>> {
        Ok(self.strategies.read().await.clone())
    }

    async fn create(&self, req: CreateStrategyRequest) -> Result<Strategy> {
        let req = req.normalized()?;
        let mut strategies = self.strategies.write().await;
        if strategies.iter().any(|s| s.value == req.value) {
            return Err(Error::Conflict(format!(
                "Strategy '{}' already exists",
                req.value
            )));
        }
        let strategy = Strategy {
            id: new_v7(),
            value: req.value,
            label: req.label,
        };
        strategies.push(strategy.clone());
        Ok(strategy)
    }

    async fn update(&self, id: Uuid, value: &str, label: &str) -> Result<Strategy> {
        let mut strategies = self.strategies.write().await;
        if strategies.iter().any(|s| s.id != id && s.value == value) {
            return Err(Error::Conflict(format!(
                "Strategy '{}' already exists",
                value
            )));
        }
        let strategy = strategies
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(Error::StrategyNotFound(id))?;
        strategy.value = value.to_string();
        strategy.label = label.to_string();
        Ok(strategy.clone())
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let mut strategies = self.strategies.write().await;
        let before = strategies.len();
        strategies.retain(|s| s.id != id);
        if strategies.len() == before {
            return Err(Error::StrategyNotFound(id));
        }
        Ok(())
    }

    async fn replace_all(&self, requests: Vec<CreateStrategyRequest>) -> Result<Vec<Strategy>> {
        let requests = requests
            .into_iter()
            .map(CreateStrategyRequest::normalized)
            .collect::<Result<Vec<_>>>()?;
        let mut replacement: Vec<Strategy> = Vec::with_capacity(requests.len());
        for req in requests {
            if replacement.iter().any(|s| s.value == req.value) {
                return Err(Error::Conflict(format!(
                    "Strategy '{}' already exists",
                    req.value
                )));
            }
            replacement.push(Strategy {
                id: new_v7(),
                value: req.value,
                label: req.label,
            });
        }
        *self.strategies.write().await = replacement.clone();
        Ok(replacement)
    }
}
