// Embedding catalog: resolves a pretrained table name to an EmbeddingTable.
//
// The catalog is the only place that touches the disk. Fetching tables from
// the network is left to whoever populates the directory; DirectoryCatalog
// only reads files that are already there, stored as `<name>.txt` or
// `<name>.vec` in word2vec text format.

use std::path::{Path, PathBuf};

use tracing::info;

use super::table::EmbeddingTable;
use crate::error::{MetricError, Result};

/// File extensions recognised as word2vec text tables, in lookup order.
const TABLE_EXTENSIONS: [&str; 2] = ["txt", "vec"];

/// Anything that can produce an embedding table from a name.
///
/// Loading may be slow (large files), so callers resolve once and reuse
/// the result. Implementations report every failure as `EmbeddingLoad`.
pub trait EmbeddingCatalog {
    fn load(&self, name: &str) -> Result<EmbeddingTable>;
}

/// Returns the default directory for pretrained tables.
/// Uses the platform data directory: ~/.local/share/topicsim/embeddings/ on Linux.
pub fn default_embeddings_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("topicsim")
        .join("embeddings")
}

/// Catalog backed by a local directory of word2vec text files.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    dir: PathBuf,
}

impl DirectoryCatalog {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file backing `name`, if one exists.
    pub fn path_for(&self, name: &str) -> Option<PathBuf> {
        TABLE_EXTENSIONS
            .iter()
            .map(|ext| self.dir.join(format!("{name}.{ext}")))
            .find(|p| p.is_file())
    }

    /// Names of all tables available in the directory, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let entries = std::fs::read_dir(&self.dir).map_err(|e| MetricError::EmbeddingLoad {
            name: self.dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let mut names: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| TABLE_EXTENSIONS.contains(&ext))
            })
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

impl EmbeddingCatalog for DirectoryCatalog {
    fn load(&self, name: &str) -> Result<EmbeddingTable> {
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(MetricError::EmbeddingLoad {
                name: name.to_string(),
                reason: "not a valid table name".to_string(),
            });
        }

        let path = self.path_for(name).ok_or_else(|| MetricError::EmbeddingLoad {
            name: name.to_string(),
            reason: format!("no {name}.txt or {name}.vec in {}", self.dir.display()),
        })?;

        let table = EmbeddingTable::from_path(&path).map_err(|e| match e {
            MetricError::EmbeddingLoad { reason, .. } => MetricError::EmbeddingLoad {
                name: name.to_string(),
                reason,
            },
            other => other,
        })?;

        info!(
            name,
            path = %path.display(),
            words = table.len(),
            dim = table.vector_size(),
            "Loaded embedding table"
        );

        Ok(table)
    }
}
