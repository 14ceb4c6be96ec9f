// Topic similarity metrics.
//
// All of them share one shape: enumerate every unordered pair of distinct
// topics in index-ascending order, score the pair, and average. They differ
// in how a pair is scored:
//
//   pairwise: mean cosine over every top-k word pair
//   centroid: cosine between mean top-k word vectors
//   weighted: cosine between probability-weighted centroids over the
//     whole vocabulary
//   jaccard: set overlap of top-k words, no embeddings
//   ranked: 1 - rank-biased-overlap diversity

pub mod centroid;
pub mod jaccard;
pub mod pairwise;
pub mod ranked;
pub mod traits;
pub mod weighted;

pub use centroid::CentroidSimilarity;
pub use jaccard::JaccardOverlap;
pub use pairwise::PairwiseWordSimilarity;
pub use ranked::{
    RankedOverlapCentroidSimilarity, RankedOverlapMatchSimilarity, RankedOverlapSimilarity,
};
pub use traits::{TopicDiversity, TopicMetric};
pub use weighted::WeightedCentroidSimilarity;

use crate::embeddings::EmbeddingProvider;
use crate::error::{MetricError, Result};

/// What an embedding-backed scorer does with a word that has no vector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingWordPolicy {
    /// Leave the word out of every sum and every count.
    #[default]
    Skip,
    /// Stop scoring with `UndefinedVector`.
    Fail,
}

impl MissingWordPolicy {
    /// Look up `word`, applying the policy when it is absent.
    pub(crate) fn lookup<'a>(
        self,
        embeddings: &'a EmbeddingProvider,
        word: &str,
    ) -> Result<Option<&'a [f32]>> {
        match embeddings.vector(word) {
            Some(vector) => Ok(Some(vector)),
            None => match self {
                Self::Skip => Ok(None),
                Self::Fail => Err(MetricError::UndefinedVector(word.to_string())),
            },
        }
    }
}

/// Every unordered pair `(i, j)` with `i < j < n`, index-ascending.
pub(crate) fn topic_pairs(n: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j)))
}

/// Pairwise metrics need at least one pair.
pub(crate) fn require_pairs(topic_count: usize) -> Result<()> {
    if topic_count < 2 {
        return Err(MetricError::NoTopicPairs(topic_count));
    }
    Ok(())
}

/// `topk` must not exceed the first topic's length, which stands in for
/// every topic's length.
pub(crate) fn require_topk(topics: &[Vec<String>], topk: usize) -> Result<()> {
    let available = topics.first().map_or(0, Vec::len);
    if topk > available {
        return Err(MetricError::InsufficientWords { topk, available });
    }
    Ok(())
}

/// Mean of `score(i, j)` over every topic pair.
pub(crate) fn mean_over_pairs(n: usize, mut score: impl FnMut(usize, usize) -> f64) -> f64 {
    let mut sum = 0.0;
    let mut pairs = 0usize;
    for (i, j) in topic_pairs(n) {
        sum += score(i, j);
        pairs += 1;
    }
    if pairs == 0 {
        0.0
    } else {
        sum / pairs as f64
    }
}

/// The first `topk` words of a topic (fewer if the topic is shorter).
pub(crate) fn top_words(topic: &[String], topk: usize) -> &[String] {
    &topic[..topk.min(topic.len())]
}

/// Build a provider from literal vectors for unit tests.
#[cfg(test)]
pub(crate) fn provider_from(entries: &[(&str, &[f32])]) -> EmbeddingProvider {
    let mapping: indexmap::IndexMap<String, Vec<f32>> = entries
        .iter()
        .map(|(word, vector)| (word.to_string(), vector.to_vec()))
        .collect();
    EmbeddingProvider::from_table(crate::embeddings::EmbeddingTable::from_vectors(&mapping).unwrap())
}
