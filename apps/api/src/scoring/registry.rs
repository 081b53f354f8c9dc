use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};

use super::dense::{DenseEmbeddingScorer, DenseModel, FastEmbedder, TextEmbedder};
use super::linguistic::LinguisticScorer;
use super::tfidf::TfidfScorer;
use super::{RawScore, Scorer, ScorerKind, ScoringError};

/// Embedder backing the linguistic strategy's word vectors.
const WORD_VECTOR_MODEL: DenseModel = DenseModel::MiniLmL6V2;

/// The ordered set of active scoring strategies.
pub struct ScorerRegistry {
    scorers: Vec<Arc<dyn Scorer>>,
}

impl ScorerRegistry {
    pub fn new(scorers: Vec<Arc<dyn Scorer>>) -> Self {
        Self { scorers }
    }

    /// Builds the configured strategies with ONNX embedders cached under
    /// `cache_dir`. Blocking: model weights may be downloaded.
    pub fn load(kinds: &[ScorerKind], cache_dir: &Path) -> Result<Self> {
        Self::from_kinds_with(kinds, |model| {
            let embedder: Arc<dyn TextEmbedder> = Arc::new(FastEmbedder::load(model, cache_dir)?);
            Ok(embedder)
        })
    }

    /// Builds strategies in the order given. `load_embedder` is called at most
    /// once per model; strategies needing the same model share it.
    pub fn from_kinds_with<F>(kinds: &[ScorerKind], mut load_embedder: F) -> Result<Self>
    where
        F: FnMut(DenseModel) -> Result<Arc<dyn TextEmbedder>>,
    {
        let mut embedders: HashMap<DenseModel, Arc<dyn TextEmbedder>> = HashMap::new();
        let mut embedder_for = |model: DenseModel| -> Result<Arc<dyn TextEmbedder>> {
            if let Some(existing) = embedders.get(&model) {
                return Ok(existing.clone());
            }
            let loaded = load_embedder(model)?;
            embedders.insert(model, loaded.clone());
            Ok(loaded)
        };

        let mut scorers: Vec<Arc<dyn Scorer>> = Vec::with_capacity(kinds.len());
        for kind in kinds {
            let scorer: Arc<dyn Scorer> = match kind {
                ScorerKind::AllMiniLmL6V2 => {
                    let model = DenseModel::MiniLmL6V2;
                    Arc::new(DenseEmbeddingScorer::for_model(model, embedder_for(model)?))
                }
                ScorerKind::BgeSmallEnV15 => {
                    let model = DenseModel::BgeSmallEnV15;
                    Arc::new(DenseEmbeddingScorer::for_model(model, embedder_for(model)?))
                }
                ScorerKind::Tfidf => Arc::new(TfidfScorer::new()),
                ScorerKind::Linguistic => {
                    Arc::new(LinguisticScorer::new(embedder_for(WORD_VECTOR_MODEL)?))
                }
            };
            info!(kind = %kind, model = scorer.model_name(), "Registered scoring strategy");
            scorers.push(scorer);
        }

        Ok(Self::new(scorers))
    }

    pub fn model_names(&self) -> Vec<&str> {
        self.scorers.iter().map(|s| s.model_name()).collect()
    }

    /// Runs every strategy in registration order. A failing strategy is left
    /// out of the result; if none succeeds the whole call fails.
    pub fn score_all(
        &self,
        resume_text: &str,
        job_description: &str,
    ) -> Result<Vec<RawScore>, ScoringError> {
        let mut results = Vec::with_capacity(self.scorers.len());

        for scorer in &self.scorers {
            match scorer.score(resume_text, job_description) {
                Ok(value) => results.push(RawScore {
                    model_name: scorer.model_name().to_string(),
                    label: scorer.label().to_string(),
                    value,
                }),
                Err(e) => warn!(model = scorer.model_name(), "Scoring strategy failed: {e}"),
            }
        }

        if results.is_empty() {
            return Err(ScoringError::AllStrategiesFailed);
        }
        Ok(results)
    }
}
