// Pairwise Jaccard similarity of top-k word sets.
//
// Compares topics purely by the words they share, no embeddings involved.
// For each pair the top-k lists are treated as sets (a word repeated within
// one topic counts once):
//
//   |A ∩ B| / (|A| + |B| - |A ∩ B|)
//
// Topics shorter than k contribute every word they have.

use std::collections::HashSet;

use tracing::debug;

use super::traits::TopicMetric;
use super::{mean_over_pairs, require_pairs, top_words};
use crate::config::DEFAULT_TOPK;
use crate::error::Result;
use crate::topics::ModelOutput;

/// Mean Jaccard overlap of top-k words across topic pairs.
#[derive(Debug, Clone)]
pub struct JaccardOverlap {
    /// How many top words of each topic to compare
    pub topk: usize,
}

impl Default for JaccardOverlap {
    fn default() -> Self {
        Self { topk: DEFAULT_TOPK }
    }
}

impl JaccardOverlap {
    pub fn new(topk: usize) -> Self {
        Self { topk }
    }
}

/// Jaccard ratio of two word sets. Two empty sets score 0.0.
pub fn jaccard(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let intersection = a.intersection(b).count();
    let union = a.len() + b.len() - intersection;
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

impl TopicMetric for JaccardOverlap {
    fn name(&self) -> &'static str {
        "pairwise_jaccard_similarity"
    }

    fn score(&self, output: &ModelOutput) -> Result<f64> {
        let topics = &output.topics;
        require_pairs(topics.len())?;

        let sets: Vec<HashSet<&str>> = topics
            .iter()
            .map(|topic| top_words(topic, self.topk).iter().map(String::as_str).collect())
            .collect();

        let score = mean_over_pairs(sets.len(), |i, j| jaccard(&sets[i], &sets[j]));

        debug!(
            metric = self.name(),
            topics = topics.len(),
            topk = self.topk,
            score,
            "Computed Jaccard overlap"
        );

        Ok(score)
    }
}
