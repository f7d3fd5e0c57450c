use axum::{Json, extract::State};
use serde::Serialize;

use crate::app::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    topics: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    features: Option<usize>,
}

/// Handler for GET /health/live
pub async fn live(State(state): State<AppState>) -> Json<HealthReport> {
    state.telemetry().record_live_probe();
    Json(HealthReport {
        status: "live",
        topics: None,
        features: None,
    })
}

/// Handler for GET /health/ready
///
/// The state only exists once both artifacts have loaded, so reaching this handler means ready.
pub async fn ready(State(state): State<AppState>) -> Json<HealthReport> {
    state.telemetry().record_ready_probe();
    let analyzer = state.analyzer();
    Json(HealthReport {
        status: "ready",
        topics: Some(analyzer.n_topics()),
        features: Some(analyzer.n_features()),
    })
}
