// Unit tests for embedding resolution.
//
// Covers EmbeddingProvider::resolve for each source variant, bit-exact
// preservation of explicit vectors, word2vec file parsing through the
// directory catalog, and sharing one resolved table across threads.

use std::sync::Arc;

use indexmap::IndexMap;
use topicsim::embeddings::{
    DirectoryCatalog, EmbeddingCatalog, EmbeddingProvider, EmbeddingSource, EmbeddingTable,
};
use topicsim::metrics::{CentroidSimilarity, PairwiseWordSimilarity, TopicMetric};
use topicsim::topics::ModelOutput;
use topicsim::MetricError;

/// A catalog that must never be consulted.
struct UnreachableCatalog;

impl EmbeddingCatalog for UnreachableCatalog {
    fn load(&self, name: &str) -> Result<EmbeddingTable, MetricError> {
        Err(MetricError::EmbeddingLoad {
            name: name.to_string(),
            reason: "catalog should not be used for explicit sources".to_string(),
        })
    }
}

fn awkward_vectors() -> IndexMap<String, Vec<f32>> {
    // Values that don't survive a round trip through text or f64 math
    let mut mapping = IndexMap::new();
    mapping.insert("pi".to_string(), vec![std::f32::consts::PI, -0.0, 1e-38]);
    mapping.insert("tiny".to_string(), vec![f32::MIN_POSITIVE, f32::EPSILON, 0.1]);
    mapping.insert("big".to_string(), vec![f32::MAX, -f32::MAX, 3.402_823e20]);
    mapping
}

// ============================================================
// Explicit mappings
// ============================================================

#[test]
fn mapping_vectors_preserved_bit_for_bit() {
    let mapping = awkward_vectors();
    let provider =
        EmbeddingProvider::resolve(EmbeddingSource::Vectors(mapping.clone()), &UnreachableCatalog)
            .unwrap();

    for (word, original) in &mapping {
        let stored = provider.vector(word).unwrap();
        let stored_bits: Vec<u32> = stored.iter().map(|v| v.to_bits()).collect();
        let original_bits: Vec<u32> = original.iter().map(|v| v.to_bits()).collect();
        assert_eq!(stored_bits, original_bits, "vector for {word} changed");
    }
}

#[test]
fn mapping_vocabulary_follows_insertion_order() {
    let provider =
        EmbeddingProvider::resolve(EmbeddingSource::Vectors(awkward_vectors()), &UnreachableCatalog)
            .unwrap();
    let words: Vec<&str> = provider.table().words().collect();
    assert_eq!(words, vec!["pi", "tiny", "big"]);
    assert_eq!(provider.vector_size(), 3);
}

#[test]
fn mapping_with_mixed_lengths_rejected() {
    let mut mapping = awkward_vectors();
    mapping.insert("odd".to_string(), vec![1.0, 2.0]);
    let err = EmbeddingProvider::resolve(EmbeddingSource::Vectors(mapping), &UnreachableCatalog)
        .unwrap_err();
    assert!(
        matches!(err, MetricError::InvalidEmbeddingFormat(ref msg) if msg.contains("odd")),
        "unexpected error: {err}"
    );
}

#[test]
fn empty_mapping_rejected() {
    let err = EmbeddingProvider::resolve(
        EmbeddingSource::Vectors(IndexMap::new()),
        &UnreachableCatalog,
    )
    .unwrap_err();
    assert!(matches!(err, MetricError::InvalidEmbeddingFormat(_)));
}

#[test]
fn source_from_table_conversion() {
    let table = EmbeddingTable::from_vectors(&awkward_vectors()).unwrap();
    let source = EmbeddingSource::from(table.clone());
    let provider = EmbeddingProvider::resolve(source, &UnreachableCatalog).unwrap();
    assert_eq!(provider.table(), &table);
}

// ============================================================
// Directory catalog
// ============================================================

#[test]
fn pretrained_name_loaded_from_directory() {
    let dir = std::env::temp_dir().join("topicsim-unit-embeddings-catalog");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join("mini-news-3.txt"),
        "3 3\nking 0.9 0.1 0.0\nqueen 0.85 0.15 0.0\napple 0.0 0.2 0.9\n",
    )
    .unwrap();

    let catalog = DirectoryCatalog::new(&dir);
    let provider = EmbeddingProvider::resolve(
        EmbeddingSource::Pretrained(Some("mini-news-3".to_string())),
        &catalog,
    )
    .unwrap();

    assert_eq!(provider.table().len(), 3);
    assert_eq!(provider.vector_size(), 3);
    assert!(provider.contains("queen"));
    assert!(!provider.contains("pear"));

    // Cleanup
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn default_table_missing_from_empty_directory() {
    let dir = std::env::temp_dir().join("topicsim-unit-embeddings-empty");
    std::fs::create_dir_all(&dir).unwrap();

    let catalog = DirectoryCatalog::new(&dir);
    let err = EmbeddingProvider::resolve(EmbeddingSource::Pretrained(None), &catalog).unwrap_err();
    match err {
        MetricError::EmbeddingLoad { name, .. } => assert_eq!(name, "word2vec-google-news-300"),
        other => panic!("expected EmbeddingLoad, got {other:?}"),
    }

    // Cleanup
    std::fs::remove_dir_all(&dir).unwrap();
}

// ============================================================
// Sharing a resolved table
// ============================================================

#[test]
fn one_table_shared_by_scorers_across_threads() {
    let mut mapping = IndexMap::new();
    mapping.insert("red".to_string(), vec![1.0, 0.0]);
    mapping.insert("blue".to_string(), vec![0.0, 1.0]);
    let table = Arc::new(EmbeddingTable::from_vectors(&mapping).unwrap());

    let provider =
        EmbeddingProvider::resolve(EmbeddingSource::Table(Arc::clone(&table)), &UnreachableCatalog)
            .unwrap();
    let pairwise = PairwiseWordSimilarity::new(provider.clone()).with_topk(1);
    let centroid = CentroidSimilarity::new(provider).with_topk(1);
    let output = ModelOutput::from_topics([["red"], ["red"]]);

    std::thread::scope(|scope| {
        let a = scope.spawn(|| pairwise.score(&output).unwrap());
        let b = scope.spawn(|| centroid.score(&output).unwrap());
        assert!((a.join().unwrap() - 1.0).abs() < 1e-9);
        assert!((b.join().unwrap() - 1.0).abs() < 1e-9);
    });

    // The caller's handle plus the two scorers
    assert_eq!(Arc::strong_count(&table), 3);
}
