//! Linguistic scorer: compares documents as bags of lemmas.
//!
//! Each document is reduced to its content lemmas. Every distinct lemma is
//! embedded as a word, and the document vector is the frequency-weighted
//! mean of those word vectors. Similarity of the two document vectors is
//! mapped onto [0, 100] as `sim * 100`, negative values clamped to 0.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use super::dense::TextEmbedder;
use super::text::lemmas;
use super::{cosine_similarity, is_blank_pair, rescale_unit, Scorer, ScoringError, EMPTY_TEXT_SCORE};

pub const LINGUISTIC_MODEL_NAME: &str = "linguistic-word-vectors-1.0";
pub const LINGUISTIC_LABEL: &str = "linguistic";

/// Distinct lemmas embedded per document; the most frequent are kept.
pub const MAX_LEMMAS_PER_DOCUMENT: usize = 256;

pub struct LinguisticScorer {
    embedder: Arc<dyn TextEmbedder>,
}

impl LinguisticScorer {
    pub fn new(embedder: Arc<dyn TextEmbedder>) -> Self {
        Self { embedder }
    }

    fn document_vector(&self, text: &str) -> Result<Option<Vec<f32>>, ScoringError> {
        let bag = lemma_bag(text, MAX_LEMMAS_PER_DOCUMENT);
        if bag.is_empty() {
            return Ok(None);
        }

        let words: Vec<&str> = bag.iter().map(|(w, _)| w.as_str()).collect();
        let vectors = self.embedder.embed(&words).map_err(|e| ScoringError::Model {
            model: LINGUISTIC_MODEL_NAME.to_string(),
            message: format!("{e:#}"),
        })?;
        if vectors.len() != words.len() {
            return Err(ScoringError::Model {
                model: LINGUISTIC_MODEL_NAME.to_string(),
                message: format!("expected {} word vectors, got {}", words.len(), vectors.len()),
            });
        }

        Ok(Some(weighted_mean(&vectors, bag.iter().map(|(_, n)| *n))))
    }
}

impl Scorer for LinguisticScorer {
    fn model_name(&self) -> &str {
        LINGUISTIC_MODEL_NAME
    }

    fn label(&self) -> &str {
        LINGUISTIC_LABEL
    }

    fn score(&self, resume_text: &str, job_description: &str) -> Result<f64, ScoringError> {
        if is_blank_pair(resume_text, job_description) {
            return Ok(EMPTY_TEXT_SCORE);
        }

        let (Some(resume_vec), Some(jd_vec)) = (
            self.document_vector(resume_text)?,
            self.document_vector(job_description)?,
        ) else {
            // Nothing but stop words and numerals on one side.
            return Ok(EMPTY_TEXT_SCORE);
        };

        let similarity = cosine_similarity(&resume_vec, &jd_vec);
        trace!(similarity, "Lemma vector cosine");
        rescale_unit(LINGUISTIC_MODEL_NAME, similarity)
    }
}

/// Distinct lemmas with their counts, most frequent first, ties in order of
/// first appearance, truncated to `limit`.
fn lemma_bag(text: &str, limit: usize) -> Vec<(String, u32)> {
    let mut order: HashMap<String, usize> = HashMap::new();
    let mut bag: Vec<(String, u32)> = Vec::new();

    for lemma in lemmas(text) {
        match order.get(&lemma) {
            Some(&i) => bag[i].1 += 1,
            None => {
                order.insert(lemma.clone(), bag.len());
                bag.push((lemma, 1));
            }
        }
    }

    // Stable sort keeps first-appearance order among equal counts.
    bag.sort_by(|a, b| b.1.cmp(&a.1));
    bag.truncate(limit);
    bag
}

fn weighted_mean(vectors: &[Vec<f32>], weights: impl Iterator<Item = u32>) -> Vec<f32> {
    let dims = vectors.first().map_or(0, Vec::len);
    let mut sum = vec![0.0f32; dims];
    let mut total = 0.0f32;

    for (vector, weight) in vectors.iter().zip(weights) {
        let w = weight as f32;
        for (acc, x) in sum.iter_mut().zip(vector) {
            *acc += x * w;
        }
        total += w;
    }

    if total > 0.0 {
        for v in &mut sum {
            *v /= total;
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::testing::{FailingEmbedder, HashingEmbedder};

    fn scorer() -> LinguisticScorer {
        LinguisticScorer::new(Arc::new(HashingEmbedder))
    }

    #[test]
    fn test_lemma_bag_counts_and_orders() {
        let bag = lemma_bag("Deploying services; deployed service mesh", 10);
        assert_eq!(bag[0], ("deploy".to_string(), 2));
        assert_eq!(bag[1], ("service".to_string(), 2));
        assert_eq!(bag[2], ("mesh".to_string(), 1));
    }

    #[test]
    fn test_lemma_bag_truncates() {
        let bag = lemma_bag("alpha beta gamma delta beta", 2);
        assert_eq!(bag.len(), 2);
        assert_eq!(bag[0].0, "beta");
        assert_eq!(bag[1].0, "alpha");
    }

    #[test]
    fn test_weighted_mean() {
        let mean = weighted_mean(&[vec![1.0, 0.0], vec![0.0, 1.0]], [3, 1].into_iter());
        assert!((mean[0] - 0.75).abs() < 1e-6);
        assert!((mean[1] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_inflections_match() {
        let s = scorer()
            .score("Deployed services and designed libraries", "deploying service, designing library")
            .unwrap();
        assert!((s - 100.0).abs() < 1e-3, "got {s}");
    }

    #[test]
    fn test_stop_word_document_scores_zero() {
        assert_eq!(scorer().score("the and of 2024", "rust engineer").unwrap(), 0.0);
    }

    #[test]
    fn test_blank_input_scores_zero() {
        assert_eq!(scorer().score("", "rust").unwrap(), EMPTY_TEXT_SCORE);
    }

    #[test]
    fn test_embedder_failure_propagates() {
        let scorer = LinguisticScorer::new(Arc::new(FailingEmbedder));
        assert!(matches!(
            scorer.score("rust engineer", "rust developer"),
            Err(ScoringError::Model { .. })
        ));
    }
}
