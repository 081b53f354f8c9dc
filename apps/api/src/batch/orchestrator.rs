use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::batch::models::{ApplicationScore, ScoreRequest, ScoreResponse};
use crate::extraction::{extract_text_blocking, ExtractionError};
use crate::scoring::{RawScore, ScorerRegistry, ScoringError};
use crate::storage::{Locator, ObjectStore, StorageError};

/// Stage at which an item stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStage {
    Retrieve,
    Extract,
    Score,
}

impl fmt::Display for ItemStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ItemStage::Retrieve => "retrieve",
            ItemStage::Extract => "extract",
            ItemStage::Score => "score",
        })
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

impl PipelineError {
    pub fn stage(&self) -> ItemStage {
        match self {
            PipelineError::Storage(_) => ItemStage::Retrieve,
            PipelineError::Extraction(_) => ItemStage::Extract,
            PipelineError::Scoring(_) => ItemStage::Score,
        }
    }
}

/// Runs one resume through the pipeline and returns every strategy's
/// unrounded score. Extraction and scoring run on the blocking pool.
pub async fn score_application(
    store: &dyn ObjectStore,
    registry: &Arc<ScorerRegistry>,
    resume_path: &str,
    job_description: &str,
) -> Result<Vec<RawScore>, PipelineError> {
    let locator: Locator = resume_path.parse()?;
    let pdf = store.fetch(&locator).await?;
    debug!(bytes = pdf.len(), "Retrieved resume");

    let text = extract_text_blocking(pdf).await?;
    debug!(chars = text.len(), "Extracted resume text");

    let registry = Arc::clone(registry);
    let job_description = job_description.to_owned();
    let scores = tokio::task::spawn_blocking(move || registry.score_all(&text, &job_description))
        .await
        .map_err(|e| ScoringError::Task(e.to_string()))??;

    Ok(scores)
}

/// Scores every application in request order. Failed items are dropped from
/// the response; the batch itself never fails because of them.
pub async fn score_batch(
    store: &dyn ObjectStore,
    registry: &Arc<ScorerRegistry>,
    request: &ScoreRequest,
) -> ScoreResponse {
    let batch_id = Uuid::new_v4();
    let total = request.application_sort_requests.len();
    let span = info_span!("score_batch", %batch_id, items = total);

    async move {
        info!("Scoring {total} applications");
        let mut scores = Vec::with_capacity(total);

        for item in &request.application_sort_requests {
            let result = score_application(
                store,
                registry,
                &item.resume_path,
                &request.job_description,
            )
            .instrument(info_span!("application", application_id = %item.application_id))
            .await;

            match result {
                Ok(raw) => {
                    debug!(
                        application_id = %item.application_id,
                        models = raw.len(),
                        "Application scored"
                    );
                    scores.push(ApplicationScore {
                        application_id: item.application_id.clone(),
                        model_scores: raw.iter().map(RawScore::to_model_score).collect(),
                    });
                }
                Err(e) => warn!(
                    application_id = %item.application_id,
                    stage = %e.stage(),
                    resume_path = %item.resume_path,
                    "Dropping application: {e}"
                ),
            }
        }

        info!("Scored {} of {total} applications", scores.len());
        ScoreResponse { scores }
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::models::ApplicationSortRequest;
    use crate::extraction::fixtures::pdf_with_pages;
    use crate::scoring::tfidf::TfidfScorer;
    use crate::scoring::Scorer;
    use crate::storage::memory::MemoryObjectStore;

    const JD: &str = "Senior backend engineer with Go experience building distributed services";

    fn tfidf_registry() -> Arc<ScorerRegistry> {
        let tfidf: Arc<dyn Scorer> = Arc::new(TfidfScorer::new());
        Arc::new(ScorerRegistry::new(vec![tfidf]))
    }

    fn item(id: &str, path: &str) -> ApplicationSortRequest {
        ApplicationSortRequest {
            application_id: id.to_string(),
            resume_path: path.to_string(),
        }
    }

    fn store() -> MemoryObjectStore {
        MemoryObjectStore::default()
            .with(
                "s3://resumes/a1.pdf",
                pdf_with_pages(&["Backend engineer building distributed services"]),
            )
            .with(
                "s3://resumes/a3.pdf",
                pdf_with_pages(&["Pastry chef", "Croissants and sourdough"]),
            )
            .with("s3://resumes/broken.pdf", b"not a pdf".to_vec())
    }

    #[tokio::test]
    async fn test_score_application_end_to_end() {
        let scores = score_application(&store(), &tfidf_registry(), "s3://resumes/a1.pdf", JD)
            .await
            .unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].model_name, "tfidf-1.0");
        assert!(scores[0].value > 0.0);
    }

    #[tokio::test]
    async fn test_score_application_stages() {
        let registry = tfidf_registry();
        let store = store();

        let err = score_application(&store, &registry, "resumes/a1.pdf", JD)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), ItemStage::Retrieve);
        assert!(matches!(err, PipelineError::Storage(StorageError::InvalidLocator(_))));

        let err = score_application(&store, &registry, "s3://resumes/missing.pdf", JD)
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::Storage(StorageError::Retrieval { .. })));

        let err = score_application(&store, &registry, "s3://resumes/broken.pdf", JD)
            .await
            .unwrap_err();
        assert_eq!(err.stage(), ItemStage::Extract);
    }

    #[tokio::test]
    async fn test_batch_drops_failed_items_and_keeps_order() {
        let request = ScoreRequest {
            job_description: JD.to_string(),
            application_sort_requests: vec![
                item("A1", "s3://resumes/a1.pdf"),
                item("A2", "not-a-locator"),
                item("A3", "s3://resumes/a3.pdf"),
            ],
        };

        let response = score_batch(&store(), &tfidf_registry(), &request).await;

        let ids: Vec<_> = response
            .scores
            .iter()
            .map(|s| s.application_id.as_str())
            .collect();
        assert_eq!(ids, vec!["A1", "A3"]);
        assert!(response.scores.iter().all(|s| s.model_scores.len() == 1));
        assert!(response.scores[0].model_scores[0].score > response.scores[1].model_scores[0].score);
    }

    #[tokio::test]
    async fn test_batch_with_every_item_failing_is_empty() {
        let request = ScoreRequest {
            job_description: JD.to_string(),
            application_sort_requests: vec![
                item("B1", "s3://resumes/missing.pdf"),
                item("B2", "s3://resumes/broken.pdf"),
            ],
        };
        let response = score_batch(&store(), &tfidf_registry(), &request).await;
        assert!(response.scores.is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_ids_are_scored_independently() {
        let request = ScoreRequest {
            job_description: JD.to_string(),
            application_sort_requests: vec![
                item("A1", "s3://resumes/a1.pdf"),
                item("A1", "s3://resumes/a3.pdf"),
            ],
        };
        let response = score_batch(&store(), &tfidf_registry(), &request).await;
        assert_eq!(response.scores.len(), 2);
    }
}
