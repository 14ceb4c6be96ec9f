// Error kinds returned by embedding resolution and metric scoring.
//
// Scoring is a pure function of its inputs, so every failure here is
// reported straight back to the caller. Nothing is retried.

use thiserror::Error;

/// Everything that can go wrong while resolving embeddings or scoring topics.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricError {
    /// A word -> vector mapping or embedding file was malformed.
    #[error("invalid embedding format: {0}")]
    InvalidEmbeddingFormat(String),

    /// The embedding catalog could not produce the named table.
    #[error("failed to load embedding table '{name}': {reason}")]
    EmbeddingLoad { name: String, reason: String },

    /// `topk` is larger than the number of words in the topics.
    #[error("words in topics are less than topk ({available} < {topk})")]
    InsufficientWords { topk: usize, available: usize },

    /// Pairwise metrics need at least two topics.
    #[error("at least two topics are needed to form a pair, got {0}")]
    NoTopicPairs(usize),

    /// The weighted scorer was called without what it needs.
    #[error("missing {0}")]
    MissingDistribution(&'static str),

    /// A topic-word distribution does not line up with the vocabulary.
    #[error("distribution row {row} has {actual} entries, expected {expected}")]
    InvalidDistribution {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// An id2word mapping skips ids, so it cannot index a distribution.
    #[error("invalid id2word mapping: {0}")]
    InvalidVocabulary(String),

    /// A word is absent from the embedding table and the scorer is strict.
    #[error("word '{0}' is not in the embedding vocabulary")]
    UndefinedVector(String),
}

pub type Result<T> = std::result::Result<T, MetricError>;
