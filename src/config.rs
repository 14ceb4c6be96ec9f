use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::metrics::MissingWordPolicy;

/// Pretrained table used when a scorer is given neither vectors nor a name.
pub const DEFAULT_EMBEDDING_MODEL: &str = "word2vec-google-news-300";

/// Number of top words compared per topic unless configured otherwise.
pub const DEFAULT_TOPK: usize = 10;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding pretrained word2vec text tables
    pub embeddings_dir: PathBuf,
    /// Pretrained table to load when no explicit embeddings file is given
    pub model_name: String,
    /// How many top words per topic the metrics compare
    pub topk: usize,
    /// What to do when a word has no vector
    pub missing_words: MissingWordPolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Everything has a default; only malformed values are errors.
    pub fn load() -> Result<Self> {
        let embeddings_dir = env::var("TOPICSIM_EMBEDDINGS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| crate::embeddings::catalog::default_embeddings_dir());

        let topk = match env::var("TOPICSIM_TOPK") {
            Ok(raw) => parse_topk(&raw).context("Invalid TOPICSIM_TOPK")?,
            Err(_) => DEFAULT_TOPK,
        };

        let missing_words = match env::var("TOPICSIM_MISSING_WORDS") {
            Ok(raw) => parse_missing_words(&raw).context("Invalid TOPICSIM_MISSING_WORDS")?,
            Err(_) => MissingWordPolicy::default(),
        };

        Ok(Self {
            embeddings_dir,
            model_name: env::var("TOPICSIM_MODEL")
                .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string()),
            topk,
            missing_words,
        })
    }

    /// Check that the embeddings directory exists.
    /// Call this before loading a pretrained table by name.
    pub fn require_embeddings_dir(&self) -> Result<()> {
        if !self.embeddings_dir.is_dir() {
            anyhow::bail!(
                "Embeddings directory not found: {}\n\
                 Put word2vec text files (<name>.txt) there, or set TOPICSIM_EMBEDDINGS_DIR.\n\
                 Or pass --embeddings <file> to use a specific file.",
                self.embeddings_dir.display()
            );
        }
        Ok(())
    }
}

/// Parse a top-k word count. Zero is rejected since every metric would
/// compare empty word lists.
pub fn parse_topk(raw: &str) -> Result<usize> {
    let topk: usize = raw
        .trim()
        .parse()
        .with_context(|| format!("topk must be a positive integer, got '{raw}'"))?;
    if topk == 0 {
        anyhow::bail!("topk must be greater than 0");
    }
    Ok(topk)
}

/// Parse a missing-word policy: `skip` or `fail`, case-insensitive.
pub fn parse_missing_words(raw: &str) -> Result<MissingWordPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "skip" => Ok(MissingWordPolicy::Skip),
        "fail" => Ok(MissingWordPolicy::Fail),
        other => anyhow::bail!("missing-word policy must be 'skip' or 'fail', got '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_topk_valid() {
        assert_eq!(parse_topk("25").unwrap(), 25);
        assert_eq!(parse_topk(" 5 ").unwrap(), 5);
    }

    #[test]
    fn test_parse_topk_rejects_zero_and_garbage() {
        assert!(parse_topk("0").is_err());
        assert!(parse_topk("ten").is_err());
        assert!(parse_topk("-3").is_err());
    }

    #[test]
    fn test_parse_missing_words() {
        assert_eq!(parse_missing_words("skip").unwrap(), MissingWordPolicy::Skip);
        assert_eq!(parse_missing_words(" Fail ").unwrap(), MissingWordPolicy::Fail);
        assert!(parse_missing_words("strict").is_err());
        assert!(parse_missing_words("").is_err());
    }

    #[test]
    fn test_require_embeddings_dir_missing() {
        let config = Config {
            embeddings_dir: std::env::temp_dir().join("topicsim-config-nonexistent"),
            model_name: DEFAULT_EMBEDDING_MODEL.to_string(),
            topk: DEFAULT_TOPK,
            missing_words: MissingWordPolicy::Skip,
        };
        assert!(config.require_embeddings_dir().is_err());
    }
}
