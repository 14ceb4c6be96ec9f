// topicsim: embedding-based similarity metrics for topic models
//
// This is the library root. Embeddings are resolved once into a shared
// table, and each metric scores a topic model's output against it.

pub mod config;
pub mod embeddings;
pub mod error;
pub mod metrics;
pub mod output;
pub mod topics;

pub use error::MetricError;
