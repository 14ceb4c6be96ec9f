// Embedding sources and the provider that resolves them.
//
// A source is one of three things: a table that already exists, an explicit
// word -> vector mapping, or the name of a pretrained table (None meaning
// the default). The variant is matched exactly once, in `resolve`; scorers
// only ever see the resulting provider.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::info;

use super::catalog::EmbeddingCatalog;
use super::table::EmbeddingTable;
use crate::config::DEFAULT_EMBEDDING_MODEL;
use crate::error::Result;

/// Where a scorer's word vectors come from.
#[derive(Debug, Clone)]
pub enum EmbeddingSource {
    /// An already-built table, used unchanged.
    Table(Arc<EmbeddingTable>),
    /// Explicit word -> vector mapping; insertion order becomes table order.
    Vectors(IndexMap<String, Vec<f32>>),
    /// A pretrained table loaded through the catalog. `None` loads
    /// `DEFAULT_EMBEDDING_MODEL`.
    Pretrained(Option<String>),
}

impl From<EmbeddingTable> for EmbeddingSource {
    fn from(table: EmbeddingTable) -> Self {
        Self::Table(Arc::new(table))
    }
}

impl From<IndexMap<String, Vec<f32>>> for EmbeddingSource {
    fn from(mapping: IndexMap<String, Vec<f32>>) -> Self {
        Self::Vectors(mapping)
    }
}

/// A resolved, shareable embedding table.
///
/// Cloning is cheap (an Arc bump), so several scorers can hold the same
/// provider without reloading or copying the vectors.
#[derive(Debug, Clone)]
pub struct EmbeddingProvider {
    table: Arc<EmbeddingTable>,
}

impl EmbeddingProvider {
    /// Resolve a source into a provider. Any disk I/O happens here and
    /// nowhere else.
    pub fn resolve(source: EmbeddingSource, catalog: &dyn EmbeddingCatalog) -> Result<Self> {
        let table = match source {
            EmbeddingSource::Table(table) => table,
            EmbeddingSource::Vectors(mapping) => {
                let table = EmbeddingTable::from_vectors(&mapping)?;
                info!(
                    words = table.len(),
                    dim = table.vector_size(),
                    "Built embedding table from explicit vectors"
                );
                Arc::new(table)
            }
            EmbeddingSource::Pretrained(name) => {
                let name = name.as_deref().unwrap_or(DEFAULT_EMBEDDING_MODEL);
                Arc::new(catalog.load(name)?)
            }
        };

        Ok(Self { table })
    }

    /// Wrap a table directly, skipping the catalog entirely.
    pub fn from_table(table: impl Into<Arc<EmbeddingTable>>) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn table(&self) -> &EmbeddingTable {
        &self.table
    }

    /// The shared handle, for building further providers on the same table.
    pub fn shared(&self) -> Arc<EmbeddingTable> {
        Arc::clone(&self.table)
    }

    pub fn vector_size(&self) -> usize {
        self.table.vector_size()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.table.contains(word)
    }

    pub fn vector(&self, word: &str) -> Option<&[f32]> {
        self.table.vector(word)
    }
}
