// Word-embedding pairwise similarity.
//
// For each pair of topics, average the cosine similarity of every
// (word from A, word from B) combination drawn from their top-k lists, then
// average those pair scores over all topic pairs. Only word pairs where both
// words have vectors take part.
//
// A topic pair with no such word pair scores 0.0 and still counts toward
// the final mean.

use tracing::debug;

use super::traits::TopicMetric;
use super::{mean_over_pairs, require_pairs, require_topk, top_words, MissingWordPolicy};
use crate::config::DEFAULT_TOPK;
use crate::embeddings::math::cosine_similarity_f32;
use crate::embeddings::EmbeddingProvider;
use crate::error::Result;
use crate::topics::ModelOutput;

/// Mean word-pair cosine similarity between topics.
#[derive(Debug, Clone)]
pub struct PairwiseWordSimilarity {
    embeddings: EmbeddingProvider,
    topk: usize,
    missing_words: MissingWordPolicy,
}

impl PairwiseWordSimilarity {
    pub fn new(embeddings: EmbeddingProvider) -> Self {
        Self {
            embeddings,
            topk: DEFAULT_TOPK,
            missing_words: MissingWordPolicy::default(),
        }
    }

    pub fn with_topk(mut self, topk: usize) -> Self {
        self.topk = topk;
        self
    }

    pub fn with_missing_words(mut self, policy: MissingWordPolicy) -> Self {
        self.missing_words = policy;
        self
    }

    /// Vectors of a topic's top-k words, in rank order, skipping absent words.
    fn top_vectors<'a>(&'a self, topic: &[String]) -> Result<Vec<&'a [f32]>> {
        let mut vectors = Vec::with_capacity(self.topk);
        for word in top_words(topic, self.topk) {
            if let Some(vector) = self.missing_words.lookup(&self.embeddings, word)? {
                vectors.push(vector);
            }
        }
        Ok(vectors)
    }
}

/// Mean cosine over the cross product of two topics' word vectors.
fn pair_similarity(a: &[&[f32]], b: &[&[f32]]) -> Option<f64> {
    let word_pairs = a.len() * b.len();
    if word_pairs == 0 {
        return None;
    }
    let sum: f64 = a
        .iter()
        .flat_map(|va| b.iter().map(move |vb| cosine_similarity_f32(va, vb)))
        .sum();
    Some(sum / word_pairs as f64)
}

impl TopicMetric for PairwiseWordSimilarity {
    fn name(&self) -> &'static str {
        "we_pairwise_similarity"
    }

    fn score(&self, output: &ModelOutput) -> Result<f64> {
        let topics = &output.topics;
        require_pairs(topics.len())?;
        require_topk(topics, self.topk)?;

        let vectors = topics
            .iter()
            .map(|topic| self.top_vectors(topic))
            .collect::<Result<Vec<_>>>()?;

        let score = mean_over_pairs(topics.len(), |i, j| {
            pair_similarity(&vectors[i], &vectors[j]).unwrap_or_else(|| {
                debug!(
                    topic_a = i,
                    topic_b = j,
                    "No embedded word pairs between topics, scoring pair as 0"
                );
                0.0
            })
        });

        debug!(
            metric = self.name(),
            topics = topics.len(),
            topk = self.topk,
            score,
            "Computed pairwise word similarity"
        );

        Ok(score)
    }
}
