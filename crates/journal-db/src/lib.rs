//! # journal-db
//!
//! Storage layer for the stock trading journal.
//!
//! This crate provides:
//! - Connection pool management
//! - PostgreSQL repositories for chart entries and strategies
//! - SQL rendering of chart listing predicates
//! - An in-memory backend with identical semantics
//!
//! ## Example
//!
//! ```rust,ignore
//! use journal_db::{ChartRepository, CreateChartRequest, Database};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/journal").await?;
//!
//!     let entry = db.charts.insert(CreateChartRequest {
//!         id: "lx3k9a".to_string(),
//!         chart_name: "AAPL breakout".to_string(),
//!         stock_symbol: "AAPL".to_string(),
//!         image_urls: vec!["https://utfs.io/f/abc".to_string()],
//!         ..Default::default()
//!     }).await?;
//!
//!     println!("Created chart: {}", entry.id);
//!     Ok(())
//! }
//! ```
pub mod chart_filter;
pub mod charts;
pub mod memory;
pub mod pool;
pub mod strategies;

// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use journal_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use chart_filter::ChartFilterQueryBuilder;
pub use charts::PgChartRepository;
pub use memory::{MemoryChartRepository, MemoryStrategyRepository};
pub use pool::{close_pool, create_pool, create_pool_with_config, PoolConfig, PoolStats};
pub use strategies::PgStrategyRepository;

/// Combined database context with all repositories.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Chart entry repository.
    pub charts: PgChartRepository,
    /// Strategy registry repository.
    pub strategies: PgStrategyRepository,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            charts: PgChartRepository::new(pool.clone()),
            strategies: PgStrategyRepository::new(pool.clone()),
            pool,
        }
    }

    /// Connect with default pool configuration.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = create_pool(url).await?;
        Ok(Self::new(pool))
    }

    /// Create with custom pool configuration.
    pub async fn connect_with_config(url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }

    /// Current connection counts.
    pub fn pool_stats(&self) -> PoolStats {
        PoolStats::sample(&self.pool)
    }

    /// Close the pool.
    pub async fn close(&self) {
        close_pool(&self.pool).await;
    }
}
