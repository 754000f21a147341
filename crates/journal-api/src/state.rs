//! Shared handler state.

use std::sync::Arc;

use journal_core::{ChartRepository, StrategyRepository};
use journal_db::{Database, MemoryChartRepository, MemoryStrategyRepository};

use crate::services::AttachmentLifecycle;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub charts: Arc<dyn ChartRepository>,
    pub strategies: Arc<dyn StrategyRepository>,
    pub attachments: AttachmentLifecycle,
}

impl AppState {
    pub fn new(
        charts: Arc<dyn ChartRepository>,
        strategies: Arc<dyn StrategyRepository>,
        attachments: AttachmentLifecycle,
    ) -> Self {
        Self {
            charts,
            strategies,
            attachments,
        }
    }

    /// State backed by a PostgreSQL database.
    pub fn from_database(db: &Database, attachments: AttachmentLifecycle) -> Self {
        Self::new(
            Arc::new(db.charts.clone()),
            Arc::new(db.strategies.clone()),
            attachments,
        )
    }

    /// Process-local state with the default strategy taxonomy.
    pub fn in_memory(attachments: AttachmentLifecycle) -> Self {
        Self::new(
            Arc::new(MemoryChartRepository::new()),
            Arc::new(MemoryStrategyRepository::with_defaults()),
            attachments,
        )
    }
}
