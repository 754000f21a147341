//! Strategy registry HTTP handlers.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use journal_core::{CreateStrategyRequest, Strategy, UpdateStrategyRequest};

use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
pub struct StrategyIdQuery {
    pub id: Option<String>,
}

/// List all strategies in registry order.
pub async fn list_strategies(
    State(state): State<AppState>,
) -> Result<Json<Vec<Strategy>>, ApiError> {
    Ok(Json(state.strategies.list().await?))
}

/// Create a strategy.
///
/// # Returns
/// - 200 OK with the created strategy
/// - 400 Bad Request on missing fields or a value already in use
pub async fn create_strategy(
    State(state): State<AppState>,
    payload: Result<Json<CreateStrategyRequest>, JsonRejection>,
) -> Result<Json<Strategy>, ApiError> {
    let Json(req) = payload?;
    Ok(Json(state.strategies.create(req).await?))
}

/// Replace the value and label of a strategy.
///
/// Charts that reference the old value keep it.
pub async fn update_strategy(
    State(state): State<AppState>,
    payload: Result<Json<UpdateStrategyRequest>, JsonRejection>,
) -> Result<Json<Strategy>, ApiError> {
    let Json(req) = payload?;
    let id = req.validate()?;
    let strategy = state
        .strategies
        .update(id, req.value.trim(), req.label.trim())
        .await?;
    Ok(Json(strategy))
}

/// Delete a strategy.
///
/// # Returns
/// - 200 OK with `{id}`
/// - 400 Bad Request if `id` is missing or not a UUID
/// - 404 Not Found if no strategy has the id
pub async fn delete_strategy(
    State(state): State<AppState>,
    query: Result<Query<StrategyIdQuery>, QueryRejection>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Query(query) = query?;
    let raw = query
        .id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Strategy ID is required".to_string()))?;
    let id = Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::BadRequest(format!("Invalid strategy id '{}'", raw)))?;

    state.strategies.delete(id).await?;
    Ok(Json(serde_json::json!({ "id": id })))
}
