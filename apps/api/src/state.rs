use std::sync::Arc;

use crate::config::Config;
use crate::scoring::ScorerRegistry;
use crate::storage::ObjectStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Resume source. S3 in production, in-memory in tests.
    pub store: Arc<dyn ObjectStore>,
    /// Active scoring strategies, loaded once at startup.
    pub scorers: Arc<ScorerRegistry>,
    pub config: Config,
}
