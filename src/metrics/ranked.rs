// Rank-biased-overlap similarities.
//
// The rank-biased-overlap diversity metrics (plain ranked lists, embedding
// centroids, embedding matches) are supplied by the caller through the
// TopicDiversity trait. Each wrapper here turns one of them into a
// similarity by returning 1 - diversity; identical rankings therefore score
// 1.0. Errors from the wrapped metric pass through untouched.

use tracing::debug;

use super::traits::{TopicDiversity, TopicMetric};
use crate::error::Result;
use crate::topics::ModelOutput;

macro_rules! inverted_diversity {
    ($(#[$doc:meta])* $name:ident, $metric:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone)]
        pub struct $name<D> {
            diversity: D,
        }

        impl<D: TopicDiversity> $name<D> {
            pub fn new(diversity: D) -> Self {
                Self { diversity }
            }

            /// The wrapped diversity metric.
            pub fn inner(&self) -> &D {
                &self.diversity
            }
        }

        impl<D: TopicDiversity> TopicMetric for $name<D> {
            fn name(&self) -> &'static str {
                $metric
            }

            fn score(&self, output: &ModelOutput) -> Result<f64> {
                let diversity = self.diversity.diversity(output)?;
                let score = 1.0 - diversity;
                debug!(metric = $metric, diversity, score, "Inverted ranked-overlap diversity");
                Ok(score)
            }
        }
    };
}

inverted_diversity!(
    /// Agreement of the topics' ranked word lists, compared word for word.
    RankedOverlapSimilarity,
    "rbo"
);

inverted_diversity!(
    /// Ranked-list agreement where words are compared through embedding
    /// centroids instead of exact matches.
    RankedOverlapCentroidSimilarity,
    "word_embeddings_rbo_centroid"
);

inverted_diversity!(
    /// Ranked-list agreement where each word is matched to its most
    /// similar embedded counterpart.
    RankedOverlapMatchSimilarity,
    "word_embeddings_rbo_match"
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetricError;

    /// Returns a fixed diversity regardless of input.
    struct FixedDiversity(f64);

    impl TopicDiversity for FixedDiversity {
        fn diversity(&self, _output: &ModelOutput) -> Result<f64> {
            Ok(self.0)
        }
    }

    struct BrokenDiversity;

    impl TopicDiversity for BrokenDiversity {
        fn diversity(&self, output: &ModelOutput) -> Result<f64> {
            Err(MetricError::NoTopicPairs(output.topic_count()))
        }
    }

    #[test]
    fn test_zero_diversity_is_full_similarity() {
        let output = ModelOutput::from_topics([["a", "b"], ["a", "b"]]);
        let metric = RankedOverlapSimilarity::new(FixedDiversity(0.0));
        assert_eq!(metric.score(&output).unwrap(), 1.0);
    }

    #[test]
    fn test_each_flavour_inverts() {
        let output = ModelOutput::default();

        let centroid = RankedOverlapCentroidSimilarity::new(FixedDiversity(0.25));
        let score = centroid.score(&output).unwrap();
        assert!((score - 0.75).abs() < 1e-12, "got {score}");

        let matched = RankedOverlapMatchSimilarity::new(FixedDiversity(1.0));
        let score = matched.score(&output).unwrap();
        assert!(score.abs() < 1e-12, "got {score}");
    }

    #[test]
    fn test_names_are_distinct() {
        assert_eq!(RankedOverlapSimilarity::new(FixedDiversity(0.0)).name(), "rbo");
        assert_eq!(
            RankedOverlapCentroidSimilarity::new(FixedDiversity(0.0)).name(),
            "word_embeddings_rbo_centroid"
        );
        assert_eq!(
            RankedOverlapMatchSimilarity::new(FixedDiversity(0.0)).name(),
            "word_embeddings_rbo_match"
        );
    }

    #[test]
    fn test_errors_pass_through() {
        let output = ModelOutput::from_topics([["a"]]);
        let metric = RankedOverlapSimilarity::new(BrokenDiversity);
        assert_eq!(metric.score(&output), Err(MetricError::NoTopicPairs(1)));
    }
}
