// Topic model output: ranked word lists, distributions, and id2word.

pub mod model;

pub use model::{ModelOutput, Vocabulary};
