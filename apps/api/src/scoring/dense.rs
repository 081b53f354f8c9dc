//! Dense sentence-embedding scorers.
//!
//! Inference goes through [`TextEmbedder`] so the scorer logic can be tested
//! without downloading ONNX weights. [`FastEmbedder`] is the production
//! implementation.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{info, trace};

use super::{cosine_similarity, is_blank_pair, rescale_signed, Scorer, ScoringError, EMPTY_TEXT_SCORE};

/// Produces one vector per input text.
pub trait TextEmbedder: Send + Sync {
    fn model_name(&self) -> &str;

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}

/// Pretrained sentence-embedding models available to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenseModel {
    MiniLmL6V2,
    BgeSmallEnV15,
}

impl DenseModel {
    /// Name reported in `model_scores`.
    pub fn model_name(&self) -> &'static str {
        match self {
            DenseModel::MiniLmL6V2 => "sentence-transformers-all-MiniLM-L6-v2",
            DenseModel::BgeSmallEnV15 => "BAAI-bge-small-en-v1.5",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DenseModel::MiniLmL6V2 => "sentence-transformers",
            DenseModel::BgeSmallEnV15 => "bge-small",
        }
    }

    fn fastembed_model(&self) -> EmbeddingModel {
        match self {
            DenseModel::MiniLmL6V2 => EmbeddingModel::AllMiniLML6V2,
            DenseModel::BgeSmallEnV15 => EmbeddingModel::BGESmallENV15,
        }
    }
}

/// ONNX-backed embedder. Weights are downloaded into `cache_dir` on first use.
pub struct FastEmbedder {
    model: DenseModel,
    inner: TextEmbedding,
}

impl FastEmbedder {
    /// Loads model weights. Blocking; call from `spawn_blocking` in async code.
    pub fn load(model: DenseModel, cache_dir: &Path) -> Result<Self> {
        info!(model = model.model_name(), cache_dir = %cache_dir.display(), "Loading embedding model");

        let options = InitOptions::new(model.fastembed_model())
            .with_cache_dir(cache_dir.to_path_buf())
            .with_show_download_progress(false);
        let embedding = TextEmbedding::try_new(options)
            .with_context(|| format!("Failed to load embedding model {}", model.model_name()))?;

        Ok(Self {
            model,
            inner: embedding,
        })
    }
}

impl TextEmbedder for FastEmbedder {
    fn model_name(&self) -> &str {
        self.model.model_name()
    }

    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.inner.embed(texts.to_vec(), None)
    }
}

/// Scores by cosine similarity between the two texts' embeddings, mapped
/// from [-1, 1] onto [0, 100].
pub struct DenseEmbeddingScorer {
    embedder: Arc<dyn TextEmbedder>,
    model_name: String,
    label: String,
}

impl DenseEmbeddingScorer {
    #[cfg(test)]
    pub fn new(embedder: Arc<dyn TextEmbedder>, label: impl Into<String>) -> Self {
        let model_name = embedder.model_name().to_string();
        Self {
            embedder,
            model_name,
            label: label.into(),
        }
    }

    pub fn for_model(model: DenseModel, embedder: Arc<dyn TextEmbedder>) -> Self {
        Self {
            embedder,
            model_name: model.model_name().to_string(),
            label: model.label().to_string(),
        }
    }
}

impl Scorer for DenseEmbeddingScorer {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn label(&self) -> &str {
        &self.label
    }

    fn score(&self, resume_text: &str, job_description: &str) -> Result<f64, ScoringError> {
        if is_blank_pair(resume_text, job_description) {
            return Ok(EMPTY_TEXT_SCORE);
        }

        let vectors = self
            .embedder
            .embed(&[resume_text, job_description])
            .map_err(|e| ScoringError::Model {
                model: self.model_name.clone(),
                message: format!("{e:#}"),
            })?;

        let [resume_vec, jd_vec] = vectors.as_slice() else {
            return Err(ScoringError::Model {
                model: self.model_name.clone(),
                message: format!("expected 2 embeddings, got {}", vectors.len()),
            });
        };

        let similarity = cosine_similarity(resume_vec, jd_vec);
        trace!(model = %self.model_name, similarity, "Embedding cosine");
        rescale_signed(&self.model_name, similarity)
    }
}
