// Output formatting: terminal display of metric results.

pub mod terminal;

use crate::error::MetricError;
use crate::metrics::TopicMetric;
use crate::topics::ModelOutput;

/// One metric's result, kept even when scoring failed so the report can
/// show every metric that was asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricScore {
    pub name: &'static str,
    pub outcome: Result<f64, MetricError>,
}

/// Run every metric against the same output.
pub fn score_all(metrics: &[Box<dyn TopicMetric>], output: &ModelOutput) -> Vec<MetricScore> {
    metrics
        .iter()
        .map(|metric| MetricScore {
            name: metric.name(),
            outcome: metric.score(output),
        })
        .collect()
}
