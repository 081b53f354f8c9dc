//! Lexical overlap scorer.
//!
//! Each call fits a two-document TF-IDF model over the resume and the job
//! description: raw term counts, smoothed inverse document frequency
//! `ln((1 + n) / (1 + df)) + 1` and English stop words removed. Cosine
//! similarity of the two vectors is non-negative, so it maps onto [0, 100]
//! as `sim * 100`.

use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use super::text::content_tokens;
use super::{cosine_similarity, is_blank_pair, rescale_unit, Scorer, ScoringError, EMPTY_TEXT_SCORE};

pub const TFIDF_MODEL_NAME: &str = "tfidf-1.0";
pub const TFIDF_LABEL: &str = "tfidf";

#[derive(Debug, Default, Clone, Copy)]
pub struct TfidfScorer;

impl TfidfScorer {
    pub fn new() -> Self {
        Self
    }
}

impl Scorer for TfidfScorer {
    fn model_name(&self) -> &str {
        TFIDF_MODEL_NAME
    }

    fn label(&self) -> &str {
        TFIDF_LABEL
    }

    fn score(&self, resume_text: &str, job_description: &str) -> Result<f64, ScoringError> {
        if is_blank_pair(resume_text, job_description) {
            return Ok(EMPTY_TEXT_SCORE);
        }

        let [resume_vec, jd_vec] = tfidf_vectors([resume_text, job_description]);
        let similarity = cosine_similarity(&resume_vec, &jd_vec);
        trace!(similarity, "TF-IDF cosine");

        rescale_unit(TFIDF_MODEL_NAME, similarity)
    }
}

fn term_counts(text: &str) -> HashMap<String, u32> {
    let mut counts = HashMap::new();
    for token in content_tokens(text) {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// TF-IDF vectors for a small corpus, aligned on a sorted shared vocabulary.
fn tfidf_vectors<const N: usize>(docs: [&str; N]) -> [Vec<f32>; N] {
    let counts = docs.map(term_counts);

    // Document frequency per term; BTreeMap keeps the vocabulary order stable.
    let mut df: BTreeMap<&str, u32> = BTreeMap::new();
    for doc in &counts {
        for term in doc.keys() {
            *df.entry(term.as_str()).or_insert(0) += 1;
        }
    }

    let n = N as f64;
    let idf: Vec<(&str, f64)> = df
        .iter()
        .map(|(term, &d)| (*term, ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0))
        .collect();

    counts.each_ref().map(|doc| {
        idf.iter()
            .map(|(term, w)| doc.get(*term).map_or(0.0, |&tf| (tf as f64 * w) as f32))
            .collect()
    })
}
