use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use super::state::AppState;
use crate::handler::{analyze, health, index, metrics};

/// Build the HTTP router: the review form, the JSON API, probes and metrics.
pub fn build_router(state: AppState, body_limit_bytes: usize) -> Router {
    Router::new()
        .route("/", get(index::index))
        .route("/analyze", post(analyze::analyze_form))
        .route("/v1/analyze", post(analyze::analyze_json))
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .route("/metrics", get(metrics::exporter))
        .layer(DefaultBodyLimit::max(body_limit_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
