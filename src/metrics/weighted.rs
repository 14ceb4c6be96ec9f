// Word-embedding weighted-sum similarity.
//
// Instead of the top-k words, each topic is represented by the
// probability-weighted mean of the vectors of its entire vocabulary:
//
//   centroid(t) = sum(p(w|t) * v(w)) / sum(p(w|t))
//
// with both sums running over the words that have vectors. A pair of topics
// scores the cosine similarity of their centroids, and the metric is the
// mean over all pairs.
//
// Pairs are (row i, row j) for i < j, and the mean divides by the number of
// pairs actually scored. A topic whose embedded words carry no probability
// mass has no centroid; its pairs score 0.0.

use tracing::debug;

use super::traits::TopicMetric;
use super::{mean_over_pairs, require_pairs, MissingWordPolicy};
use crate::embeddings::math::{accumulate, cosine_similarity, normalize_by};
use crate::embeddings::EmbeddingProvider;
use crate::error::{MetricError, Result};
use crate::topics::{ModelOutput, Vocabulary};

/// Cosine similarity between probability-weighted topic centroids.
#[derive(Debug, Clone)]
pub struct WeightedCentroidSimilarity {
    embeddings: EmbeddingProvider,
    id2word: Vocabulary,
    missing_words: MissingWordPolicy,
}

impl WeightedCentroidSimilarity {
    pub fn new(embeddings: EmbeddingProvider, id2word: Vocabulary) -> Self {
        Self {
            embeddings,
            id2word,
            missing_words: MissingWordPolicy::default(),
        }
    }

    /// With `Fail`, only words that carry non-zero probability are required
    /// to have vectors.
    pub fn with_missing_words(mut self, policy: MissingWordPolicy) -> Self {
        self.missing_words = policy;
        self
    }

    /// Weighted mean vector for one distribution row, or None when no
    /// embedded word has weight.
    pub fn centroid(&self, row: &[f64]) -> Result<Option<Vec<f64>>> {
        let mut centroid = vec![0.0_f64; self.embeddings.vector_size()];
        let mut weight_sum = 0.0_f64;

        for (id, &weight) in row.iter().enumerate() {
            if weight == 0.0 {
                continue;
            }
            let Some(word) = self.id2word.word(id) else {
                continue;
            };
            if let Some(vector) = self.missing_words.lookup(&self.embeddings, word)? {
                accumulate(&mut centroid, vector, weight);
                weight_sum += weight;
            }
        }

        Ok(normalize_by(&mut centroid, weight_sum).then_some(centroid))
    }

    /// The distribution, checked against the vocabulary.
    fn distribution<'a>(&self, output: &'a ModelOutput) -> Result<&'a [Vec<f64>]> {
        let rows = output
            .topic_word_distribution
            .as_deref()
            .ok_or(MetricError::MissingDistribution("topic-word-distribution"))?;
        if self.id2word.is_empty() {
            return Err(MetricError::MissingDistribution("id2word mapping"));
        }

        let expected = self.id2word.len();
        if let Some((row, values)) = rows.iter().enumerate().find(|(_, r)| r.len() != expected) {
            return Err(MetricError::InvalidDistribution {
                row,
                expected,
                actual: values.len(),
            });
        }

        Ok(rows)
    }
}

impl TopicMetric for WeightedCentroidSimilarity {
    fn name(&self) -> &'static str {
        "we_weighted_sum_similarity"
    }

    fn score(&self, output: &ModelOutput) -> Result<f64> {
        let rows = self.distribution(output)?;
        require_pairs(rows.len())?;

        let centroids = rows
            .iter()
            .map(|row| self.centroid(row))
            .collect::<Result<Vec<_>>>()?;

        let score = mean_over_pairs(rows.len(), |i, j| match (&centroids[i], &centroids[j]) {
            (Some(a), Some(b)) => cosine_similarity(a, b),
            _ => {
                debug!(
                    topic_a = i,
                    topic_b = j,
                    "Topic without weighted embedded words, scoring pair as 0"
                );
                0.0
            }
        });

        debug!(
            metric = self.name(),
            topics = rows.len(),
            vocabulary = self.id2word.len(),
            score,
            "Computed weighted centroid similarity"
        );

        Ok(score)
    }
}
