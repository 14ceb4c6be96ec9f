// Word embeddings: tables, sources, the on-disk catalog, and vector math.

pub mod catalog;
pub mod math;
pub mod source;
pub mod table;

pub use catalog::{DirectoryCatalog, EmbeddingCatalog};
pub use source::{EmbeddingProvider, EmbeddingSource};
pub use table::EmbeddingTable;
