//! # journal-api
//!
//! HTTP surface of the stock trading journal: chart and strategy CRUD over
//! axum, plus best-effort cleanup of hosted chart images.

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;
pub mod state;
pub mod telemetry;

use axum::http::{header, HeaderValue, Method, Request};
use axum::routing::get;
use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

pub use config::{ApiConfig, StoreBackend};
pub use error::ApiError;
pub use state::AppState;

/// JSON bodies are small; images go straight to the upload service.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Generates time-ordered UUIDv7 request correlation IDs.
#[derive(Clone, Default)]
struct MakeRequestUuidV7;

impl MakeRequestId for MakeRequestUuidV7 {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let id = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(id))
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(std::time::Duration::from_secs(3600))
}

/// Build the application router with its middleware stack.
pub fn router(state: AppState, allowed_origins: &[String]) -> Router {
    use handlers::{charts, strategies};

    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/api/charts",
            get(charts::list_or_get_charts)
                .post(charts::create_chart)
                .put(charts::update_chart)
                .delete(charts::delete_chart),
        )
        .route(
            "/api/strategies",
            get(strategies::list_strategies)
                .post(strategies::create_strategy)
                .put(strategies::update_strategy)
                .delete(strategies::delete_strategy),
        )
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuidV7))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer(allowed_origins))
                .map_response(|res: axum::response::Response<_>| res.map(axum::body::Body::new))
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
