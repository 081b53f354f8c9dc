use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::scoring::ScorerKind;

const DEFAULT_SCORING_MODELS: &str = "all-minilm-l6-v2,tfidf";

/// Application configuration loaded from environment variables.
/// Read once at startup; there is no hot-reload.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub s3: S3Settings,
    /// Scoring strategies in the order their scores appear in responses.
    pub scorers: Vec<ScorerKind>,
    pub model_cache_dir: PathBuf,
    pub max_batch_size: usize,
}

#[derive(Debug, Clone)]
pub struct S3Settings {
    /// Custom endpoint (MinIO). `None` uses the AWS default endpoint.
    pub endpoint: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
    pub region: String,
    pub force_path_style: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let endpoint = optional_env("S3_ENDPOINT");
        let access_key = optional_env("S3_ACCESS_KEY");
        let secret_key = optional_env("S3_SECRET_KEY");
        if access_key.is_some() != secret_key.is_some() {
            bail!("S3_ACCESS_KEY and S3_SECRET_KEY must be set together");
        }

        let force_path_style = match optional_env("S3_FORCE_PATH_STYLE") {
            Some(v) => parse_bool(&v).context("S3_FORCE_PATH_STYLE must be true or false")?,
            None => endpoint.is_some(),
        };

        let scorers = parse_scorer_kinds(
            &optional_env("SCORING_MODELS").unwrap_or_else(|| DEFAULT_SCORING_MODELS.to_string()),
        )
        .context("Invalid SCORING_MODELS")?;

        let max_batch_size = std::env::var("MAX_BATCH_SIZE")
            .unwrap_or_else(|_| "100".to_string())
            .parse::<usize>()
            .context("MAX_BATCH_SIZE must be a positive integer")?;
        if max_batch_size == 0 {
            bail!("MAX_BATCH_SIZE must be a positive integer");
        }

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            s3: S3Settings {
                endpoint,
                access_key,
                secret_key,
                region: optional_env("S3_REGION").unwrap_or_else(|| "us-east-1".to_string()),
                force_path_style,
            },
            scorers,
            model_cache_dir: optional_env("MODEL_CACHE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".fastembed_cache")),
            max_batch_size,
        })
    }
}

/// Parses a comma-separated list of strategy names.
/// Rejects unknown names, duplicates and empty lists.
pub fn parse_scorer_kinds(raw: &str) -> Result<Vec<ScorerKind>> {
    let mut kinds = Vec::new();
    for name in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let kind: ScorerKind = name.parse()?;
        if kinds.contains(&kind) {
            bail!("Scoring model '{name}' listed more than once");
        }
        kinds.push(kind);
    }
    if kinds.is_empty() {
        bail!("At least one scoring model must be configured");
    }
    Ok(kinds)
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => bail!("'{other}' is not a boolean"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_model_list_parses() {
        let kinds = parse_scorer_kinds(DEFAULT_SCORING_MODELS).unwrap();
        assert_eq!(kinds, vec![ScorerKind::AllMiniLmL6V2, ScorerKind::Tfidf]);
    }

    #[test]
    fn test_model_list_preserves_order_and_trims() {
        let kinds = parse_scorer_kinds(" tfidf , linguistic,bge-small-en-v1.5 ").unwrap();
        assert_eq!(
            kinds,
            vec![
                ScorerKind::Tfidf,
                ScorerKind::Linguistic,
                ScorerKind::BgeSmallEnV15
            ]
        );
    }

    #[test]
    fn test_unknown_model_rejected() {
        assert!(parse_scorer_kinds("tfidf,word2vec").is_err());
    }

    #[test]
    fn test_duplicate_model_rejected() {
        assert!(parse_scorer_kinds("tfidf,TFIDF").is_err());
    }

    #[test]
    fn test_empty_model_list_rejected() {
        assert!(parse_scorer_kinds(" , ").is_err());
    }

    #[test]
    fn test_parse_bool_variants() {
        assert!(parse_bool("TRUE").unwrap());
        assert!(!parse_bool("0").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
