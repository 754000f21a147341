//! Chart entry repository implementation.

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};

use journal_core::{
    ChartEntry, ChartPredicate, ChartRepository, CreateChartRequest, Error, Result,
    UpdateChartRequest,
};

use crate::chart_filter::ChartFilterQueryBuilder;

const CHART_COLUMNS: &str = "c.id, c.chart_name, c.stock_symbol, c.chart_date, c.image_urls, \
     c.strategy, c.execution, c.market_cap, c.tags, c.notes, c.created_at, c.updated_at";

/// PostgreSQL implementation of ChartRepository.
#[derive(Clone)]
pub struct PgChartRepository {
    pool: Pool<Postgres>,
}

impl PgChartRepository {
    /// Create a new PgChartRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn map_row_to_chart(row: PgRow) -> Result<ChartEntry> {
    let execution: String = row.get("execution");
    let market_cap: String = row.get("market_cap");
    Ok(ChartEntry {
        id: row.get("id"),
        chart_name: row.get("chart_name"),
        stock_symbol: row.get("stock_symbol"),
        date: row.get("chart_date"),
        image_urls: row.get("image_urls"),
        strategy: row.get("strategy"),
        execution: execution.parse()?,
        market_cap: market_cap.parse()?,
        tags: row.get("tags"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn not_found(id: &str) -> Error {
    Error::ChartNotFound(id.to_string())
}

#[async_trait]
impl ChartRepository for PgChartRepository {
    async fn list(&self, predicate: &ChartPredicate) -> Result<Vec<ChartEntry>> {
        let start = Instant::now();
        let (clause, params) = ChartFilterQueryBuilder::new(predicate, 0).build();
        let sql = format!(
            "SELECT {} FROM chart_entry c WHERE {} ORDER BY c.created_at DESC, c.id DESC",
            CHART_COLUMNS, clause
        );

        let mut query = sqlx::query(&sql);
        for param in params {
            query = query.bind(param);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(Error::Database)?;

        let charts = rows
            .into_iter()
            .map(map_row_to_chart)
            .collect::<Result<Vec<_>>>()?;

        debug!(
            subsystem = "db",
            component = "charts",
            op = "list",
            result_count = charts.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Listed chart entries"
        );
        Ok(charts)
    }

    async fn fetch(&self, id: &str) -> Result<ChartEntry> {
        let sql = format!("SELECT {} FROM chart_entry c WHERE c.id = $1", CHART_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| not_found(id))?;
        map_row_to_chart(row)
    }

    async fn insert(&self, req: CreateChartRequest) -> Result<ChartEntry> {
        let entry = req.into_entry(Utc::now())?;

        let result = sqlx::query(
            "INSERT INTO chart_entry (id, chart_name, stock_symbol, chart_date, image_urls,
                                      strategy, execution, market_cap, tags, notes,
                                      created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             ON CONFLICT (id) DO NOTHING",
        )
        .bind(&entry.id)
        .bind(&entry.chart_name)
        .bind(&entry.stock_symbol)
        .bind(&entry.date)
        .bind(&entry.image_urls)
        .bind(&entry.strategy)
        .bind(entry.execution.as_str())
        .bind(entry.market_cap.as_str())
        .bind(&entry.tags)
        .bind(&entry.notes)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::Conflict(format!(
                "Chart entry '{}' already exists",
                entry.id
            )));
        }

        info!(
            subsystem = "db",
            component = "charts",
            op = "insert",
            chart_id = %entry.id,
            image_count = entry.image_urls.len(),
            "Chart entry inserted"
        );
        Ok(entry)
    }

    async fn update(&self, id: &str, req: UpdateChartRequest) -> Result<ChartEntry> {
        let req = req.normalized()?;
        let now = Utc::now();

        let mut sets = vec!["updated_at = $2".to_string()];
        let mut param_idx = 2;
        let mut push = |assignment: &str| {
            param_idx += 1;
            sets.push(assignment.replace("$?", &format!("${}", param_idx)));
        };
        if req.chart_name.is_some() {
            push("chart_name = $?");
        }
        if req.stock_symbol.is_some() {
            push("stock_symbol = $?");
        }
        if req.date.is_some() {
            push("chart_date = $?");
        }
        if req.image_urls.is_some() {
            push("image_urls = $?");
        }
        if req.image_url.is_some() {
            push("image_urls = array_append(c.image_urls, $?)");
        }
        if req.strategy.is_some() {
            push("strategy = $?");
        }
        if req.execution.is_some() {
            push("execution = $?");
        }
        if req.market_cap.is_some() {
            push("market_cap = $?");
        }
        if req.tags.is_some() {
            push("tags = $?");
        }
        if req.notes.is_some() {
            push("notes = $?");
        }

        let sql = format!(
            "UPDATE chart_entry c SET {} WHERE c.id = $1 RETURNING {}",
            sets.join(", "),
            CHART_COLUMNS
        );

        // Bind order mirrors the SET list above.
        let mut query = sqlx::query(&sql).bind(id).bind(now);
        if let Some(v) = req.chart_name {
            query = query.bind(v);
        }
        if let Some(v) = req.stock_symbol {
            query = query.bind(v);
        }
        if let Some(v) = req.date {
            query = query.bind(v);
        }
        if let Some(v) = req.image_urls {
            query = query.bind(v);
        }
        if let Some(v) = req.image_url {
            query = query.bind(v);
        }
        if let Some(v) = req.strategy {
            query = query.bind(v);
        }
        if let Some(v) = req.execution {
            query = query.bind(v.as_str());
        }
        if let Some(v) = req.market_cap {
            query = query.bind(v.as_str());
        }
        if let Some(v) = req.tags {
            query = query.bind(v);
        }
        if let Some(v) = req.notes {
            query = query.bind(v);
        }

        let row = query
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| not_found(id))?;

        info!(
            subsystem = "db",
            component = "charts",
            op = "update",
            chart_id = %id,
            fields = sets.len() - 1,
            "Chart entry updated"
        );
        map_row_to_chart(row)
    }

    async fn delete(&self, id: &str) -> Result<ChartEntry> {
        let sql = format!(
            "DELETE FROM chart_entry c WHERE c.id = $1 RETURNING {}",
            CHART_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or_else(|| not_found(id))?;

        info!(
            subsystem = "db",
            component = "charts",
            op = "delete",
            chart_id = %id,
            "Chart entry deleted"
        );
        map_row_to_chart(row)
    }
}
