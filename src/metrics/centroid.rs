// Word-embedding centroid similarity.
//
// Each topic is represented by the mean vector of its top-k words; a topic
// pair scores the cosine similarity of the two centroids (1 - cosine
// distance). Words without vectors are left out of the mean.
//
// A topic with no embedded words has no centroid. Any pair involving it
// scores 0.0, the same rule PairwiseWordSimilarity applies.

use tracing::debug;

use super::traits::TopicMetric;
use super::{mean_over_pairs, require_pairs, require_topk, top_words, MissingWordPolicy};
use crate::config::DEFAULT_TOPK;
use crate::embeddings::math::{accumulate, cosine_similarity, normalize_by};
use crate::embeddings::EmbeddingProvider;
use crate::error::Result;
use crate::topics::ModelOutput;

/// Cosine similarity between topic centroids.
#[derive(Debug, Clone)]
pub struct CentroidSimilarity {
    embeddings: EmbeddingProvider,
    topk: usize,
    missing_words: MissingWordPolicy,
}

impl CentroidSimilarity {
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

    /// Mean vector of the topic's embedded top-k words, or None if it has none.
    pub fn centroid(&self, topic: &[String]) -> Result<Option<Vec<f64>>> {
        let mut centroid = vec![0.0_f64; self.embeddings.vector_size()];
        let mut count = 0usize;

        for word in top_words(topic, self.topk) {
            if let Some(vector) = self.missing_words.lookup(&self.embeddings, word)? {
                accumulate(&mut centroid, vector, 1.0);
                count += 1;
            }
        }

        Ok(normalize_by(&mut centroid, count as f64).then_some(centroid))
    }
}

impl TopicMetric for CentroidSimilarity {
    fn name(&self) -> &'static str {
        "we_centroid_similarity"
    }

    fn score(&self, output: &ModelOutput) -> Result<f64> {
        let topics = &output.topics;
        require_pairs(topics.len())?;
        require_topk(topics, self.topk)?;

        // One centroid per topic, reused by every pair it appears in
        let centroids = topics
            .iter()
            .map(|topic| self.centroid(topic))
            .collect::<Result<Vec<_>>>()?;

        let score = mean_over_pairs(topics.len(), |i, j| match (&centroids[i], &centroids[j]) {
            (Some(a), Some(b)) => cosine_similarity(a, b),
            _ => {
                debug!(
                    topic_a = i,
                    topic_b = j,
                    "Topic without embedded words, scoring pair as 0"
                );
                0.0
            }
        });

        debug!(
            metric = self.name(),
            topics = topics.len(),
            topk = self.topk,
            score,
            "Computed centroid similarity"
        );

        Ok(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetricError;
    use crate::metrics::provider_from;

    fn provider() -> EmbeddingProvider {
        provider_from(&[
            ("sun", &[1.0, 0.0, 0.0]),
            ("moon", &[0.0, 1.0, 0.0]),
            ("star", &[1.0, 1.0, 0.0]),
            ("sea", &[0.0, 0.0, 1.0]),
        ])
    }

    #[test]
    fn test_centroid_is_mean_of_embedded_words() {
        let metric = CentroidSimilarity::new(provider()).with_topk(3);
        let topic: Vec<String> = ["sun", "unknown", "moon"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let centroid = metric.centroid(&topic).unwrap().unwrap();
        // "unknown" is excluded from both sum and count
        assert_eq!(centroid, vec![0.5, 0.5, 0.0]);
    }

    #[test]
    fn test_centroid_none_without_embedded_words() {
        let metric = CentroidSimilarity::new(provider()).with_topk(1);
        let topic = vec!["unknown".to_string()];
        assert!(metric.centroid(&topic).unwrap().is_none());
    }

    #[test]
    fn test_identical_topics_score_one() {
        let metric = CentroidSimilarity::new(provider()).with_topk(2);
        let output = ModelOutput::from_topics([["sun", "moon"], ["sun", "moon"]]);
        let score = metric.score(&output).unwrap();
        assert!((score - 1.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_centroids_not_word_pairs() {
        // Pairwise word similarity would be 0.5 here; the centroids
        // (0.5, 0.5, 0) and (1, 1, 0) point the same way.
        let metric = CentroidSimilarity::new(provider()).with_topk(2);
        let output = ModelOutput::from_topics([["sun", "moon"], ["star", "star"]]);
        let score = metric.score(&output).unwrap();
        assert!((score - 1.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_topic_without_vectors_scores_zero() {
        let metric = CentroidSimilarity::new(provider()).with_topk(1);
        let output = ModelOutput::from_topics([["sun"], ["nothing"], ["sun"]]);
        // (0,1) -> 0, (0,2) -> 1, (1,2) -> 0
        let score = metric.score(&output).unwrap();
        assert!((score - 1.0 / 3.0).abs() < 1e-9, "got {score}");
    }

    #[test]
    fn test_missing_words_fail_policy() {
        let metric = CentroidSimilarity::new(provider())
            .with_topk(1)
            .with_missing_words(MissingWordPolicy::Fail);
        let output = ModelOutput::from_topics([["sun"], ["nothing"]]);
        assert_eq!(
            metric.score(&output),
            Err(MetricError::UndefinedVector("nothing".to_string()))
        );
    }

    #[test]
    fn test_preconditions() {
        let metric = CentroidSimilarity::new(provider()).with_topk(2);
        assert_eq!(
            metric.score(&ModelOutput::from_topics(Vec::<Vec<String>>::new())),
            Err(MetricError::NoTopicPairs(0))
        );
        assert_eq!(
            metric.score(&ModelOutput::from_topics([["sun"], ["moon"]])),
            Err(MetricError::InsufficientWords {
                topk: 2,
                available: 1
            })
        );
    }
}
