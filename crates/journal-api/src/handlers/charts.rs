//! Chart entry HTTP handlers.
//!
//! All operations share `/api/charts`; single-record operations take the id
//! from the `id` query parameter.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info};

use journal_core::{ChartFilterParams, CreateChartRequest, UpdateChartRequest};

use crate::{ApiError, AppState};

/// Query parameters for `GET /api/charts`.
#[derive(Debug, Default, Deserialize)]
pub struct ChartsQuery {
    /// When present, fetch this one entry and ignore the filters.
    pub id: Option<String>,
    #[serde(flatten)]
    pub filter: ChartFilterParams,
}

/// `?id=` on single-record writes.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

impl IdQuery {
    fn require(self) -> Result<String, ApiError> {
        self.id
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("Chart ID is required".to_string()))
    }
}

/// List charts matching the filters, newest first, or fetch one by id.
///
/// # Returns
/// - 200 OK with an array of chart entries, or a single entry when `id` is given
/// - 404 Not Found if `id` names no entry
pub async fn list_or_get_charts(
    State(state): State<AppState>,
    query: Result<Query<ChartsQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;

    if let Some(id) = query.id.filter(|id| !id.is_empty()) {
        let chart = state.charts.fetch(&id).await?;
        return Ok(Json(chart).into_response());
    }

    let predicate = query.filter.to_predicate();
    debug!(
        subsystem = "api",
        component = "charts",
        op = "list",
        unconstrained = predicate.is_unconstrained(),
        "Listing charts"
    );
    let charts = state.charts.list(&predicate).await?;
    Ok(Json(charts).into_response())
}

/// Create a chart entry.
///
/// # Returns
/// - 201 Created with `{acknowledged, insertedId, chart}`
/// - 400 Bad Request on missing required fields, a malformed date, or a duplicate id
pub async fn create_chart(
    State(state): State<AppState>,
    payload: Result<Json<CreateChartRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let chart = state.charts.insert(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "acknowledged": true,
            "insertedId": chart.id,
            "chart": chart,
        })),
    ))
}

/// Merge a partial update into a chart entry.
///
/// # Returns
/// - 200 OK with `{matchedCount, chart}`
/// - 400 Bad Request if `id` is missing or the update is invalid
/// - 404 Not Found if no entry has the id
pub async fn update_chart(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
    payload: Result<Json<UpdateChartRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let id = query.require()?;
    let Json(req) = payload?;

    let chart = state.charts.update(&id, req).await?;
    Ok(Json(serde_json::json!({
        "matchedCount": 1,
        "chart": chart,
    })))
}

/// Delete a chart entry, then remove its hosted images.
///
/// Image cleanup is best-effort and never changes the response.
///
/// # Returns
/// - 200 OK with `{success: true}`
/// - 400 Bad Request if `id` is missing
/// - 404 Not Found if no entry has the id
pub async fn delete_chart(
    State(state): State<AppState>,
    query: Result<Query<IdQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let id = query.require()?;

    let removed = state.charts.delete(&id).await?;
    let report = state
        .attachments
        .cleanup(&removed.id, &removed.image_urls)
        .await;

    info!(
        subsystem = "api",
        component = "charts",
        op = "delete",
        chart_id = %removed.id,
        deleted_count = report.deleted,
        failed_count = report.failed,
        "Chart deleted"
    );
    Ok(Json(serde_json::json!({ "success": true })))
}
