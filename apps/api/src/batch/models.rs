use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::scoring::ModelScore;

/// POST /score-batch request body.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScoreRequest {
    pub job_description: String,
    pub application_sort_requests: Vec<ApplicationSortRequest>,
}

/// One application to score. `application_id` is opaque and may repeat.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApplicationSortRequest {
    pub application_id: String,
    pub resume_path: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ScoreResponse {
    pub scores: Vec<ApplicationScore>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ApplicationScore {
    pub application_id: String,
    pub model_scores: Vec<ModelScore>,
}

/// GET /score-resumes-jd query string.
#[derive(Debug, Deserialize)]
pub struct LegacyScoreQuery {
    pub fileurl: String,
    pub job_description: String,
}

/// One entry of the legacy response array. Scores are keyed by strategy
/// label and rounded to two decimals.
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct LegacyResumeScore {
    pub resume: String,
    pub compatibility_scores: BTreeMap<String, f64>,
}
