pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::batch::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/score-batch", post(handlers::handle_score_batch))
        // Single-resume endpoint for older clients
        .route("/score-resumes-jd", get(handlers::handle_score_single))
        .with_state(state)
}
