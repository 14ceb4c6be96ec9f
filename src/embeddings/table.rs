// EmbeddingTable: the immutable word -> vector lookup every metric reads.
//
// Vectors are stacked row-major into one contiguous buffer, in the order
// the words were first seen. A table is built once (from a mapping or a
// word2vec text file) and never mutated afterwards, so it can be shared
// across threads behind an Arc without locking.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::error::{MetricError, Result};

/// Word embedding table with a fixed vector dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingTable {
    vector_size: usize,
    words: Vec<String>,
    key_to_index: HashMap<String, usize>,
    vectors: Vec<f32>,
}

impl EmbeddingTable {
    /// Build a table from an ordered word -> vector mapping.
    ///
    /// Every vector must be non-empty and share the first vector's length.
    /// Values are copied as-is, so `vector(word)` returns exactly what was
    /// supplied.
    pub fn from_vectors(mapping: &IndexMap<String, Vec<f32>>) -> Result<Self> {
        let vector_size = match mapping.values().next() {
            Some(first) if !first.is_empty() => first.len(),
            Some(_) => {
                return Err(MetricError::InvalidEmbeddingFormat(
                    "embedding vectors must be non-empty".to_string(),
                ))
            }
            None => {
                return Err(MetricError::InvalidEmbeddingFormat(
                    "embedding mapping is empty".to_string(),
                ))
            }
        };

        let mut table = Self::with_capacity(vector_size, mapping.len());
        for (word, vector) in mapping {
            if vector.len() != vector_size {
                return Err(MetricError::InvalidEmbeddingFormat(format!(
                    "vector for '{}' has length {}, expected {}",
                    word,
                    vector.len(),
                    vector_size
                )));
            }
            table.push(word.clone(), vector);
        }

        Ok(table)
    }

    /// Parse the word2vec / GloVe text format.
    ///
    /// An optional `<count> <dim>` header on the first non-blank line is
    /// recognised and skipped. Lines
    /// that don't parse, or whose dimension disagrees with the first row,
    /// are logged and skipped. Repeated words keep their first vector.
    pub fn from_word2vec_text<R: BufRead>(reader: R) -> Result<Self> {
        let mut table: Option<Self> = None;
        let mut skipped = 0usize;
        let mut seen_first = false;

        for (line_no, line) in reader.lines().enumerate() {
            let line = line.map_err(|e| {
                MetricError::InvalidEmbeddingFormat(format!("read error at line {}: {e}", line_no + 1))
            })?;
            let mut parts = line.split_whitespace();
            let Some(word) = parts.next() else {
                continue;
            };
            let values: Vec<&str> = parts.collect();

            let first = !seen_first;
            seen_first = true;
            if first && is_header(word, &values) {
                debug!(header = line.trim(), "Skipping word2vec header");
                continue;
            }

            let parsed: std::result::Result<Vec<f32>, _> =
                values.iter().map(|v| v.parse::<f32>()).collect();
            let vector = match parsed {
                Ok(v) if !v.is_empty() => v,
                _ => {
                    warn!(line = line_no + 1, word, "Skipping unparseable embedding line");
                    skipped += 1;
                    continue;
                }
            };

            let table = table.get_or_insert_with(|| Self::with_capacity(vector.len(), 0));
            if vector.len() != table.vector_size {
                warn!(
                    line = line_no + 1,
                    word,
                    dim = vector.len(),
                    expected = table.vector_size,
                    "Skipping embedding line with wrong dimension"
                );
                skipped += 1;
                continue;
            }
            if !table.contains(word) {
                table.push(word.to_string(), &vector);
            }
        }

        let table = table.ok_or_else(|| {
            MetricError::InvalidEmbeddingFormat("no embedding vectors found".to_string())
        })?;

        debug!(
            words = table.len(),
            dim = table.vector_size,
            skipped,
            "Parsed word2vec text embeddings"
        );

        Ok(table)
    }

    /// Open a word2vec text file and parse it.
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| MetricError::EmbeddingLoad {
            name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_word2vec_text(BufReader::new(file))
    }

    fn with_capacity(vector_size: usize, words: usize) -> Self {
        Self {
            vector_size,
            words: Vec::with_capacity(words),
            key_to_index: HashMap::with_capacity(words),
            vectors: Vec::with_capacity(words * vector_size),
        }
    }

    fn push(&mut self, word: String, vector: &[f32]) {
        self.key_to_index.insert(word.clone(), self.words.len());
        self.words.push(word);
        self.vectors.extend_from_slice(vector);
    }

    /// Dimension shared by every vector in the table.
    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    /// Number of words in the table.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Whether the word has a vector.
    pub fn contains(&self, word: &str) -> bool {
        self.key_to_index.contains_key(word)
    }

    /// The vector for `word`, if present.
    pub fn vector(&self, word: &str) -> Option<&[f32]> {
        let idx = *self.key_to_index.get(word)?;
        let start = idx * self.vector_size;
        Some(&self.vectors[start..start + self.vector_size])
    }

    /// The vector for `word`, or `UndefinedVector` if it is absent.
    pub fn try_vector(&self, word: &str) -> Result<&[f32]> {
        self.vector(word)
            .ok_or_else(|| MetricError::UndefinedVector(word.to_string()))
    }

    /// Words in insertion order.
    pub fn words(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }
}

/// A word2vec header is exactly two non-negative integers.
fn is_header(first: &str, rest: &[&str]) -> bool {
    rest.len() == 1 && first.parse::<usize>().is_ok() && rest[0].parse::<usize>().is_ok()
}
