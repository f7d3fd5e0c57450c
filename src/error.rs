use std::fmt;
use std::path::PathBuf;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::ConfigError;

/// Which persisted artifact an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Vectorizer,
    TopicModel,
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Vectorizer => f.write_str("vectorizer"),
            Self::TopicModel => f.write_str("topic model"),
        }
    }
}

/// Startup failure while reading or validating the fitted artifacts.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {kind} artifact at {path}: {source}")]
    Io {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {kind} artifact at {path}: {source}")]
    Decode {
        kind: ArtifactKind,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid {kind} artifact: {reason}")]
    Invalid { kind: ArtifactKind, reason: String },

    #[error("vectorizer produces {vectorizer} features but topic model expects {model}")]
    DimensionMismatch { vectorizer: usize, model: usize },
}

/// Failure inside the topic model for a single document.
#[derive(Debug, Error, PartialEq)]
pub enum InferenceError {
    #[error("feature dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("topic model returned an empty distribution")]
    EmptyDistribution,
}

/// Per-request failure surfaced at the HTTP boundary.
#[derive(Debug, Error, PartialEq)]
pub enum AnalyzeError {
    #[error("missing required field `review`")]
    MissingInput,

    #[error(transparent)]
    Inference(#[from] InferenceError),
}

impl AnalyzeError {
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingInput => StatusCode::BAD_REQUEST,
            Self::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingInput => "missing_input",
            Self::Inference(_) => "inference_failed",
        }
    }
}

/// JSON error envelope returned by the API routes.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

impl IntoResponse for AnalyzeError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code(),
                message: self.to_string(),
            },
        };
        (self.status_code(), Json(body)).into_response()
    }
}

/// Fatal process-level failure.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to load model artifacts: {0}")]
    Load(#[from] LoadError),

    #[error("failed to initialize telemetry: {0}")]
    Telemetry(String),

    #[error("failed to bind to address {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
}
