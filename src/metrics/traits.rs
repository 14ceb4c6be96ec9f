// Metric traits: the seams between scorers and their callers.
//
// Every scorer in this crate implements TopicMetric. TopicDiversity is the
// contract of the rank-biased-overlap diversity metrics, which live outside
// this crate and are wrapped by the ranked-overlap similarities.

use crate::error::Result;
use crate::topics::ModelOutput;

/// A single-number quality score over a topic model's output.
pub trait TopicMetric {
    /// Short identifier used in logs and reports.
    fn name(&self) -> &'static str;

    /// Score the model output.
    fn score(&self, output: &ModelOutput) -> Result<f64>;
}

/// A topic diversity metric returning a value in [0.0, 1.0], where 0.0
/// means every topic ranks the same words the same way.
///
/// Implementations must be deterministic for a fixed input and symmetric
/// in topic order.
pub trait TopicDiversity {
    fn diversity(&self, output: &ModelOutput) -> Result<f64>;
}

impl<T: TopicMetric + ?Sized> TopicMetric for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn score(&self, output: &ModelOutput) -> Result<f64> {
        (**self).score(output)
    }
}

impl<T: TopicDiversity + ?Sized> TopicDiversity for Box<T> {
    fn diversity(&self, output: &ModelOutput) -> Result<f64> {
        (**self).diversity(output)
    }
}
