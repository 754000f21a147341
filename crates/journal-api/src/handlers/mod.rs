//! HTTP handlers.

pub mod charts;
pub mod strategies;

use axum::response::IntoResponse;
use axum::Json;

/// Liveness check.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
