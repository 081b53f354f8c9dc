use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::batch::orchestrator::PipelineError;
use crate::scoring::ScoringError;
use crate::storage::StorageError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Extraction error: {0}")]
    Extraction(String),

    #[error("Scoring error: {0}")]
    Scoring(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Storage(StorageError::InvalidLocator(msg)) => AppError::InvalidLocator(msg),
            PipelineError::Storage(e @ StorageError::Retrieval { .. }) => {
                AppError::NotFound(e.to_string())
            }
            PipelineError::Extraction(e) => AppError::Extraction(e.to_string()),
            PipelineError::Scoring(e @ ScoringError::Task(_)) => AppError::Internal(anyhow::Error::new(e)),
            PipelineError::Scoring(e) => AppError::Scoring(e.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::InvalidLocator(msg) => (StatusCode::BAD_REQUEST, "INVALID_LOCATOR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "RETRIEVAL_ERROR", msg.clone()),
            AppError::Extraction(msg) => (StatusCode::BAD_REQUEST, "EXTRACTION_ERROR", msg.clone()),
            AppError::Scoring(msg) => {
                tracing::error!("Scoring error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "SCORING_ERROR",
                    "Resume could not be scored".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
