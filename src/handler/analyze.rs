use std::time::Instant;

use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::Html,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::app::AppState;
use crate::classification::TopicPrediction;
use crate::error::AnalyzeError;
use crate::view::{PageState, render_page};

/// Body of both analyze routes. `review` is optional so that an absent field can be reported
/// instead of rejected by the extractor.
#[derive(Debug, Deserialize)]
pub struct ReviewInput {
    pub review: Option<String>,
}

/// Handler for POST /analyze (HTML form)
///
/// Bodies the form extractor rejects are rendered as the page's error state with the rejection's
/// status.
pub async fn analyze_form(
    State(state): State<AppState>,
    form: Result<Form<ReviewInput>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let Form(input) = match form {
        Ok(form) => form,
        Err(rejection) => {
            let status = rejection.status();
            warn!(status = %status, error = %rejection, "rejected analyze form submission");
            let message = rejection.body_text();
            let page = render_page(&PageState::Error { message: &message });
            return (status, Html(page));
        }
    };

    let review = input.review.as_deref();
    match run_analysis(&state, review) {
        Ok(prediction) => {
            let page = render_page(&PageState::Result {
                review: review.unwrap_or_default(),
                prediction: &prediction,
            });
            (StatusCode::OK, Html(page))
        }
        Err(error) => {
            let message = error.to_string();
            let page = render_page(&PageState::Error { message: &message });
            (error.status_code(), Html(page))
        }
    }
}

/// Handler for POST /v1/analyze (JSON API)
///
/// # Errors
/// Responds with the [`AnalyzeError`] JSON envelope.
pub async fn analyze_json(
    State(state): State<AppState>,
    Json(input): Json<ReviewInput>,
) -> Result<Json<TopicPrediction>, AnalyzeError> {
    run_analysis(&state, input.review.as_deref()).map(Json)
}

fn run_analysis(state: &AppState, review: Option<&str>) -> Result<TopicPrediction, AnalyzeError> {
    let telemetry = state.telemetry();
    let started = Instant::now();
    let result = state.analyzer().analyze_field(review);

    match &result {
        Ok(prediction) => {
            telemetry.record_analysis(prediction, started.elapsed());
            info!(
                review_len = review.map_or(0, str::len),
                topic_index = prediction.topic_index,
                category = prediction.category,
                "review analyzed"
            );
        }
        Err(AnalyzeError::MissingInput) => {
            telemetry.record_missing_input();
            warn!("analyze request without a review field");
        }
        Err(AnalyzeError::Inference(inner)) => {
            telemetry.record_analysis_failure();
            error!(error = %inner, "topic inference failed");
        }
    }

    result
}
