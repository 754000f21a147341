//! Strategy registry repository implementation.

use async_trait::async_trait;
use sqlx::{Pool, Postgres, Row};
use tracing::info;
use uuid::Uuid;

use journal_core::{
    new_v7, CreateStrategyRequest, Error, Result, Strategy, StrategyRepository,
};

/// PostgreSQL implementation of StrategyRepository.
#[derive(Clone)]
pub struct PgStrategyRepository {
    pool: Pool<Postgres>,
}

impl PgStrategyRepository {
    /// Create a new PgStrategyRepository with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

fn duplicate(value: &str) -> Error {
    Error::Conflict(format!("Strategy '{}' already exists", value))
}

/// Map a unique-index violation on `strategy.value` to `Conflict`.
fn map_write_error(err: sqlx::Error, value: &str) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return duplicate(value);
        }
    }
    Error::Database(err)
}

#[async_trait]
impl StrategyRepository for PgStrategyRepository {
    async fn list(&self) -> Result<Vec<Strategy>> {
        let rows = sqlx::query(
            "SELECT id, value, label FROM strategy ORDER BY created_at ASC, id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        Ok(rows
            .into_iter()
            .map(|r| Strategy {
                id: r.get("id"),
                value: r.get("value"),
                label: r.get("label"),
            })
            .collect())
    }

    async fn create(&self, req: CreateStrategyRequest) -> Result<Strategy> {
        let req = req.normalized()?;
        let id = new_v7();

        let row = sqlx::query(
            "INSERT INTO strategy (id, value, label) VALUES ($1, $2, $3)
             ON CONFLICT (value) DO NOTHING
             RETURNING id",
        )
        .bind(id)
        .bind(&req.value)
        .bind(&req.label)
        .fetch_optional(&self.pool)
        .await
        .map_err(Error::Database)?;

        if row.is_none() {
            return Err(duplicate(&req.value));
        }

        info!(
            subsystem = "db",
            component = "strategies",
            op = "create",
            strategy_id = %id,
            value = %req.value,
            "Strategy created"
        );
        Ok(Strategy {
            id,
            value: req.value,
            label: req.label,
        })
    }

    async fn update(&self, id: Uuid, value: &str, label: &str) -> Result<Strategy> {
        let result = sqlx::query("UPDATE strategy SET value = $2, label = $3 WHERE id = $1")
            .bind(id)
            .bind(value)
            .bind(label)
            .execute(&self.pool)
            .await
            .map_err(|e| map_write_error(e, value))?;

        if result.rows_affected() == 0 {
            return Err(Error::StrategyNotFound(id));
        }

        info!(
            subsystem = "db",
            component = "strategies",
            op = "update",
            strategy_id = %id,
            "Strategy updated"
        );
        Ok(Strategy {
            id,
            value: value.to_string(),
            label: label.to_string(),
        })
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM strategy WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;

        if result.rows_affected() == 0 {
            return Err(Error::StrategyNotFound(id));
        }

        info!(
            subsystem = "db",
            component = "strategies",
            op = "delete",
            strategy_id = %id,
            "Strategy deleted"
        );
        Ok(())
    }

    async fn replace_all(&self, strategies: Vec<CreateStrategyRequest>) -> Result<Vec<Strategy>> {
        let strategies = strategies
            .into_iter()
            .map(CreateStrategyRequest::normalized)
            .collect::<Result<Vec<_>>>()?;

        let mut tx = self.pool.begin().await.map_err(Error::Database)?;

        sqlx::query("DELETE FROM strategy")
            .execute(&mut *tx)
            .await
            .map_err(Error::Database)?;

        let mut created = Vec::with_capacity(strategies.len());
        for req in strategies {
            let id = new_v7();
            // now() is fixed for the whole transaction; listing order needs distinct stamps.
            sqlx::query(
                "INSERT INTO strategy (id, value, label, created_at)
                 VALUES ($1, $2, $3, clock_timestamp())",
            )
            .bind(id)
            .bind(&req.value)
            .bind(&req.label)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_write_error(e, &req.value))?;

            created.push(Strategy {
                id,
                value: req.value,
                label: req.label,
            });
        }

        tx.commit().await.map_err(Error::Database)?;

        info!(
            subsystem = "db",
            component = "strategies",
            op = "replace_all",
            result_count = created.len(),
            "Strategy registry replaced"
        );
        Ok(created)
    }
}
