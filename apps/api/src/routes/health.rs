use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Static liveness probe; does not touch storage or the models.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}
