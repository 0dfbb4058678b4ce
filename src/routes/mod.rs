//! HTTP route handlers.
//!
//! Every request passes through the request-id middleware, which opens a
//! span carrying the request id so all logs for one request correlate.

pub mod health;
pub mod recommendations;

use axum::{middleware, routing::get, Router};
use http::header::{HeaderValue, CACHE_CONTROL};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_RECOMMENDATIONS;
use crate::middleware::request_id_layer;
use crate::state::AppState;

/// Creates the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    // Recommendations - never cached, each call re-fetches and re-persists
    let recommendation_routes = Router::new()
        .route("/recommendations", get(recommendations::recommend_without_id))
        .route("/recommendations/", get(recommendations::recommend_without_id))
        .route("/recommendations/{record_id}", get(recommendations::recommend))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_RECOMMENDATIONS),
        ));

    // Health check - always fresh for liveness probes
    let health_routes = Router::new().route("/health", get(health::health));

    Router::new()
        .merge(recommendation_routes)
        .merge(health_routes)
        .with_state(state)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}
