//! Axum route handlers for the scoring API.

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    Json,
};
use tracing::info;

use crate::batch::models::{LegacyResumeScore, LegacyScoreQuery, ScoreRequest, ScoreResponse};
use crate::batch::orchestrator::{score_application, score_batch};
use crate::errors::AppError;
use crate::state::AppState;

/// POST /score-batch
///
/// Scores each application's resume against the job description. Items that
/// fail are omitted from `scores`; the request only fails on invalid input.
pub async fn handle_score_batch(
    State(state): State<AppState>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Result<Json<ScoreResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::Validation(e.body_text()))?;

    if request.job_description.trim().is_empty() {
        return Err(AppError::Validation(
            "job_description cannot be empty".to_string(),
        ));
    }

    let max = state.config.max_batch_size;
    if request.application_sort_requests.len() > max {
        return Err(AppError::Validation(format!(
            "application_sort_requests has {} items; the limit is {max}",
            request.application_sort_requests.len()
        )));
    }

    let response = score_batch(state.store.as_ref(), &state.scorers, &request).await;
    Ok(Json(response))
}

/// GET /score-resumes-jd?fileurl=…&job_description=…
///
/// Single-resume endpoint kept for older clients. Unlike the batch endpoint,
/// a failure is returned to the caller.
pub async fn handle_score_single(
    State(state): State<AppState>,
    query: Result<Query<LegacyScoreQuery>, QueryRejection>,
) -> Result<Json<Vec<LegacyResumeScore>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::Validation(e.body_text()))?;
    info!(fileurl = %query.fileurl, "Scoring single resume");

    let raw = score_application(
        state.store.as_ref(),
        &state.scorers,
        &query.fileurl,
        &query.job_description,
    )
    .await?;

    let compatibility_scores = raw
        .iter()
        .map(|score| (score.label.clone(), score.rounded()))
        .collect();

    Ok(Json(vec![LegacyResumeScore {
        resume: query.fileurl,
        compatibility_scores,
    }]))
}
