//! Core traits for journal abstractions.
//!
//! These traits define the interfaces that concrete stores must satisfy,
//! enabling the PostgreSQL and in-memory backends to be swapped freely.

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::filter::ChartPredicate;
use crate::models::*;

// =============================================================================
// CHART REPOSITORY
// =============================================================================

/// Persistence gateway for chart entries.
///
/// All writes touch a single record; concurrent updates to the same id are
/// last-write-wins.
#[async_trait]
pub trait ChartRepository: Send + Sync {
    /// All entries matching the predicate, newest `created_at` first.
    async fn list(&self, predicate: &ChartPredicate) -> Result<Vec<ChartEntry>>;

    /// Fetch one entry by its client-assigned id.
    async fn fetch(&self, id: &str) -> Result<ChartEntry>;

    /// Validate, normalize and persist a new entry.
    async fn insert(&self, req: CreateChartRequest) -> Result<ChartEntry>;

    /// Merge a partial update into an existing entry.
    async fn update(&self, id: &str, req: UpdateChartRequest) -> Result<ChartEntry>;

    /// Remove an entry, returning it as it was before deletion.
    async fn delete(&self, id: &str) -> Result<ChartEntry>;
}

// =============================================================================
// STRATEGY REPOSITORY
// =============================================================================

/// CRUD over the strategy taxonomy.
#[async_trait]
pub trait StrategyRepository: Send + Sync {
    /// All strategies in store order.
    async fn list(&self) -> Result<Vec<Strategy>>;

    /// Create a strategy. Fails with `Conflict` if the value is taken.
    async fn create(&self, req: CreateStrategyRequest) -> Result<Strategy>;

    /// Replace value and label of an existing strategy.
    async fn update(&self, id: Uuid, value: &str, label: &str) -> Result<Strategy>;

    /// Delete a strategy. Charts referencing its value are left untouched.
    async fn delete(&self, id: Uuid) -> Result<()>;

    /// Clear the registry and insert the given strategies.
    async fn replace_all(&self, strategies: Vec<CreateStrategyRequest>) -> Result<Vec<Strategy>>;
}

// =============================================================================
// ATTACHMENT STORE
// =============================================================================

/// External file host that owns uploaded chart images.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &str;

    /// False when no backend is configured and deletions are skipped.
    fn enabled(&self) -> bool {
        true
    }

    /// Delete one hosted file by key. Single attempt, no retry.
    async fn delete_file(&self, key: &str) -> Result<()>;
}
