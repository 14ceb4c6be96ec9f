// ModelOutput and Vocabulary: what a topic model hands to the metrics.
//
// A topic is a ranked word list, most representative word first. Models
// that expose their full topic-word distribution also supply one row of
// probabilities per topic, indexed by vocabulary id; the Vocabulary maps
// those ids back to surface words.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{MetricError, Result};

/// Output of a trained topic model, as consumed by the metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelOutput {
    /// One ranked word list per topic
    pub topics: Vec<Vec<String>>,
    /// One probability row per topic, same order as `topics`
    #[serde(
        rename = "topic-word-distribution",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub topic_word_distribution: Option<Vec<Vec<f64>>>,
}

impl ModelOutput {
    /// Build an output from ranked word lists only.
    pub fn from_topics<T, W>(topics: T) -> Self
    where
        T: IntoIterator<Item = W>,
        W: IntoIterator,
        W::Item: Into<String>,
    {
        Self {
            topics: topics
                .into_iter()
                .map(|words| words.into_iter().map(Into::into).collect())
                .collect(),
            topic_word_distribution: None,
        }
    }

    /// Attach a topic-word distribution.
    pub fn with_distribution(mut self, distribution: Vec<Vec<f64>>) -> Self {
        self.topic_word_distribution = Some(distribution);
        self
    }

    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }
}

/// Dense id -> word mapping for a topic-word distribution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vocabulary {
    words: Vec<String>,
}

impl Vocabulary {
    pub fn new(words: Vec<String>) -> Self {
        Self { words }
    }

    /// Build from a sparse id -> word map. Ids must cover `0..n` exactly.
    pub fn from_map(id2word: BTreeMap<usize, String>) -> Result<Self> {
        let mut words = Vec::with_capacity(id2word.len());
        for (expected, (id, word)) in id2word.into_iter().enumerate() {
            if id != expected {
                return Err(MetricError::InvalidVocabulary(format!(
                    "id {expected} is missing (next id is {id})"
                )));
            }
            words.push(word);
        }
        Ok(Self { words })
    }

    /// The word for a distribution index.
    pub fn word(&self, id: usize) -> Option<&str> {
        self.words.get(id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

impl FromIterator<String> for Vocabulary {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
