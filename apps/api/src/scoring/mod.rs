//! Pluggable strategies that rate a resume against a job description.
//!
//! Every strategy implements [`Scorer`] and returns a value in [0, 100].
//! The orchestrator only sees a [`ScorerRegistry`], so strategies can be
//! added or removed through `SCORING_MODELS` without touching it.
//!
//! Empty input is handled the same way everywhere: if either text is blank
//! after trimming, the score is [`EMPTY_TEXT_SCORE`] and no model is invoked.

pub mod dense;
pub mod linguistic;
pub mod registry;
pub mod text;
pub mod tfidf;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use registry::ScorerRegistry;

/// Score assigned when the resume or the job description has no text.
pub const EMPTY_TEXT_SCORE: f64 = 0.0;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Model '{model}' failed: {message}")]
    Model { model: String, message: String },

    #[error("Model '{0}' produced a non-finite similarity")]
    NonFinite(String),

    #[error("Every scoring strategy failed")]
    AllStrategiesFailed,

    #[error("Scoring task aborted: {0}")]
    Task(String),
}

#[derive(Debug, Error)]
#[error("Unknown scoring model '{0}' (expected one of: all-minilm-l6-v2, bge-small-en-v1.5, tfidf, linguistic)")]
pub struct UnknownScorer(pub String);

/// A scoring strategy. Implementations are immutable once built and shared
/// across requests, so `score` takes `&self`.
pub trait Scorer: Send + Sync {
    /// Unique, versioned name reported in `model_scores`.
    fn model_name(&self) -> &str;

    /// Short label used by the legacy single-resume endpoint.
    fn label(&self) -> &str;

    fn score(&self, resume_text: &str, job_description: &str) -> Result<f64, ScoringError>;
}

/// Strategies selectable through configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScorerKind {
    AllMiniLmL6V2,
    BgeSmallEnV15,
    Tfidf,
    Linguistic,
}

impl ScorerKind {
    pub fn config_name(&self) -> &'static str {
        match self {
            ScorerKind::AllMiniLmL6V2 => "all-minilm-l6-v2",
            ScorerKind::BgeSmallEnV15 => "bge-small-en-v1.5",
            ScorerKind::Tfidf => "tfidf",
            ScorerKind::Linguistic => "linguistic",
        }
    }
}

impl FromStr for ScorerKind {
    type Err = UnknownScorer;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all-minilm-l6-v2" | "minilm" => Ok(ScorerKind::AllMiniLmL6V2),
            "bge-small-en-v1.5" | "bge-small" => Ok(ScorerKind::BgeSmallEnV15),
            "tfidf" | "tf-idf" => Ok(ScorerKind::Tfidf),
            "linguistic" => Ok(ScorerKind::Linguistic),
            _ => Err(UnknownScorer(s.to_string())),
        }
    }
}

impl fmt::Display for ScorerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.config_name())
    }
}

/// Unrounded output of one strategy for one resume.
#[derive(Debug, Clone, PartialEq)]
pub struct RawScore {
    pub model_name: String,
    pub label: String,
    pub value: f64,
}

impl RawScore {
    pub fn to_model_score(&self) -> ModelScore {
        ModelScore {
            model_name: self.model_name.clone(),
            score: self.value.round().clamp(0.0, 100.0) as u8,
        }
    }

    /// Two-decimal value used by the legacy endpoint.
    pub fn rounded(&self) -> f64 {
        (self.value * 100.0).round() / 100.0
    }
}

/// Score from a single model, as serialized in batch responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelScore {
    pub model_name: String,
    pub score: u8, // 0..=100
}

/// Cosine similarity. Returns 0.0 for empty, mismatched or zero-norm vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}

/// Maps a similarity in [-1, 1] onto [0, 100]: `clamp((sim + 1) * 50)`.
pub fn rescale_signed(model: &str, similarity: f32) -> Result<f64, ScoringError> {
    let sim = finite(model, similarity)?;
    Ok(((sim + 1.0) * 50.0).clamp(0.0, 100.0))
}

/// Maps a similarity in [0, 1] onto [0, 100]: `clamp(sim * 100)`.
pub fn rescale_unit(model: &str, similarity: f32) -> Result<f64, ScoringError> {
    let sim = finite(model, similarity)?;
    Ok((sim * 100.0).clamp(0.0, 100.0))
}

pub(crate) fn is_blank_pair(resume_text: &str, job_description: &str) -> bool {
    resume_text.trim().is_empty() || job_description.trim().is_empty()
}

fn finite(model: &str, similarity: f32) -> Result<f64, ScoringError> {
    if similarity.is_finite() {
        Ok(similarity as f64)
    } else {
        Err(ScoringError::NonFinite(model.to_string()))
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = [0.3, -1.2, 4.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite_vectors() {
        assert!((cosine_similarity(&[1.0, 2.0], &[-1.0, -2.0]) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_norm_is_zero_not_nan() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0], &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn test_rescale_signed_range() {
        assert_eq!(rescale_signed("m", 1.0).unwrap(), 100.0);
        assert_eq!(rescale_signed("m", 0.0).unwrap(), 50.0);
        assert_eq!(rescale_signed("m", -1.0).unwrap(), 0.0);
        assert_eq!(rescale_signed("m", 1.2).unwrap(), 100.0);
    }

    #[test]
    fn test_rescale_unit_range() {
        assert_eq!(rescale_unit("m", 0.0).unwrap(), 0.0);
        assert!((rescale_unit("m", 0.42).unwrap() - 42.0).abs() < 1e-4);
        assert_eq!(rescale_unit("m", -0.3).unwrap(), 0.0);
    }

    #[test]
    fn test_rescale_rejects_nan() {
        let err = rescale_signed("minilm", f32::NAN).unwrap_err();
        assert!(matches!(err, ScoringError::NonFinite(m) if m == "minilm"));
        assert!(rescale_unit("tfidf", f32::INFINITY).is_err());
    }

    #[test]
    fn test_raw_score_rounding() {
        let raw = RawScore {
            model_name: "tfidf-1.0".into(),
            label: "tfidf".into(),
            value: 67.456,
        };
        assert_eq!(raw.to_model_score().score, 67);
        assert_eq!(raw.rounded(), 67.46);

        let half = RawScore { value: 49.5, ..raw };
        assert_eq!(half.to_model_score().score, 50);
    }

    #[test]
    fn test_scorer_kind_parsing() {
        assert_eq!("TFIDF".parse::<ScorerKind>().unwrap(), ScorerKind::Tfidf);
        assert_eq!(
            "all-MiniLM-L6-v2".parse::<ScorerKind>().unwrap(),
            ScorerKind::AllMiniLmL6V2
        );
        assert!("spacy".parse::<ScorerKind>().is_err());
    }

    #[test]
    fn test_blank_pair_detection() {
        assert!(is_blank_pair("  \n", "job"));
        assert!(is_blank_pair("resume", ""));
        assert!(!is_blank_pair("resume", "job"));
    }
}
