use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use topicsim::config::{self, Config};
use topicsim::embeddings::{
    DirectoryCatalog, EmbeddingProvider, EmbeddingSource, EmbeddingTable,
};
use topicsim::metrics::{
    CentroidSimilarity, JaccardOverlap, PairwiseWordSimilarity, TopicMetric,
    WeightedCentroidSimilarity,
};
use topicsim::output::{self, terminal};
use topicsim::topics::{ModelOutput, Vocabulary};

/// topicsim: how similar are the topics your model found?
///
/// Scores a topic model's output with embedding-based and set-based
/// similarity metrics. Lower scores mean more diverse topics.
#[derive(Parser)]
#[command(name = "topicsim", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Score a model output file
    Score {
        /// JSON file with "topics" and optionally "topic-word-distribution"
        #[arg(long)]
        input: PathBuf,

        /// word2vec text file to use instead of a catalog table
        #[arg(long, conflicts_with = "model")]
        embeddings: Option<PathBuf>,

        /// Catalog table name (default: TOPICSIM_MODEL or word2vec-google-news-300)
        #[arg(long)]
        model: Option<String>,

        /// JSON id2word mapping (array, or object keyed by id); enables the weighted metric
        #[arg(long)]
        vocab: Option<PathBuf>,

        /// Top words per topic to compare (default: TOPICSIM_TOPK or 10)
        #[arg(long, value_parser = topk_arg)]
        topk: Option<usize>,

        /// Metrics to run (repeatable; default: all that the input supports)
        #[arg(long, value_enum)]
        metric: Vec<MetricKind>,
    },

    /// List embedding tables available in the catalog directory
    Models,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MetricKind {
    Pairwise,
    Centroid,
    Weighted,
    Jaccard,
}

fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("topicsim=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Score {
            input,
            embeddings,
            model,
            vocab,
            topk,
            metric,
        } => {
            let config = Config::load()?;
            let topk = topk.unwrap_or(config.topk);
            let output = load_model_output(&input)?;

            let id2word = vocab.as_deref().map(load_vocabulary).transpose()?;
            let kinds = select_metrics(metric, &output, id2word.is_some())?;

            // Resolve the embedding table once and share it across scorers
            let needs_embeddings = kinds.iter().any(|k| *k != MetricKind::Jaccard);
            let provider = if needs_embeddings {
                Some(resolve_embeddings(&config, embeddings.as_deref(), model)?)
            } else {
                None
            };

            let embedded = || {
                provider
                    .clone()
                    .context("Embeddings were not resolved for an embedding metric")
            };

            let mut metrics: Vec<Box<dyn TopicMetric>> = Vec::with_capacity(kinds.len());
            for kind in kinds {
                let metric: Box<dyn TopicMetric> = match kind {
                    MetricKind::Jaccard => Box::new(JaccardOverlap::new(topk)),
                    MetricKind::Pairwise => Box::new(
                        PairwiseWordSimilarity::new(embedded()?)
                            .with_topk(topk)
                            .with_missing_words(config.missing_words),
                    ),
                    MetricKind::Centroid => Box::new(
                        CentroidSimilarity::new(embedded()?)
                            .with_topk(topk)
                            .with_missing_words(config.missing_words),
                    ),
                    MetricKind::Weighted => Box::new(
                        WeightedCentroidSimilarity::new(
                            embedded()?,
                            id2word.clone().unwrap_or_default(),
                        )
                        .with_missing_words(config.missing_words),
                    ),
                };
                metrics.push(metric);
            }

            info!(
                topics = output.topic_count(),
                metrics = metrics.len(),
                topk,
                "Scoring model output"
            );

            let scores = output::score_all(&metrics, &output);
            terminal::display_scores(&scores, output.topic_count());

            let failed = scores.iter().filter(|s| s.outcome.is_err()).count();
            if failed > 0 {
                anyhow::bail!("{failed} of {} metrics failed", scores.len());
            }
        }

        Commands::Models => {
            let config = Config::load()?;
            config.require_embeddings_dir()?;
            let catalog = DirectoryCatalog::new(&config.embeddings_dir);
            let names = catalog.list()?;
            terminal::display_models(catalog.dir(), &names);
        }
    }

    Ok(())
}

/// clap value parser sharing the TOPICSIM_TOPK rules.
fn topk_arg(raw: &str) -> std::result::Result<usize, String> {
    config::parse_topk(raw).map_err(|e| e.to_string())
}

/// Read the model output JSON file.
fn load_model_output(path: &Path) -> Result<ModelOutput> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read model output from {}", path.display()))?;
    serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse model output in {}", path.display()))
}

/// Read an id2word file: either a JSON array of words, or an object mapping
/// ids to words.
fn load_vocabulary(path: &Path) -> Result<Vocabulary> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read id2word from {}", path.display()))?;

    if let Ok(vocab) = serde_json::from_str::<Vocabulary>(&json) {
        return Ok(vocab);
    }

    let map: BTreeMap<usize, String> = serde_json::from_str(&json).with_context(|| {
        format!(
            "{} is neither a JSON array of words nor an id -> word object",
            path.display()
        )
    })?;
    Ok(Vocabulary::from_map(map)?)
}

/// Decide which metrics to run. An explicit list is honored as-is; the
/// default is every metric the input can support.
fn select_metrics(
    requested: Vec<MetricKind>,
    output: &ModelOutput,
    has_vocab: bool,
) -> Result<Vec<MetricKind>> {
    if !requested.is_empty() {
        if requested.contains(&MetricKind::Weighted) && !has_vocab {
            anyhow::bail!("The weighted metric needs an id2word mapping. Pass --vocab <file>.");
        }
        let mut kinds = Vec::with_capacity(requested.len());
        for kind in requested {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        return Ok(kinds);
    }

    let mut kinds = vec![MetricKind::Pairwise, MetricKind::Centroid];
    if has_vocab && output.topic_word_distribution.is_some() {
        kinds.push(MetricKind::Weighted);
    } else if output.topic_word_distribution.is_some() {
        println!(
            "{}",
            "Tip: pass --vocab <id2word.json> to also run the weighted-sum metric.".dimmed()
        );
    }
    kinds.push(MetricKind::Jaccard);
    Ok(kinds)
}

/// Resolve embeddings from an explicit file or the catalog, with a spinner
/// while the (possibly very large) table loads.
fn resolve_embeddings(
    config: &Config,
    file: Option<&Path>,
    model: Option<String>,
) -> Result<EmbeddingProvider> {
    let catalog = DirectoryCatalog::new(&config.embeddings_dir);

    let (label, source) = match file {
        Some(path) => {
            let label = path.display().to_string();
            let table = with_spinner(&label, || EmbeddingTable::from_path(path))
                .with_context(|| format!("Failed to load embeddings from {label}"))?;
            (label, EmbeddingSource::from(table))
        }
        None => {
            config.require_embeddings_dir()?;
            let name = model.unwrap_or_else(|| config.model_name.clone());
            (name.clone(), EmbeddingSource::Pretrained(Some(name)))
        }
    };

    let provider = with_spinner(&label, || EmbeddingProvider::resolve(source, &catalog))
        .with_context(|| format!("Failed to resolve embeddings '{label}'"))?;

    if provider.table().is_empty() {
        warn!(source = %label, "Embedding table is empty");
    }

    Ok(provider)
}

fn with_spinner<T>(label: &str, load: impl FnOnce() -> T) -> T {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg} ({elapsed})")
            .expect("valid template"),
    );
    pb.set_message(format!("Loading embeddings: {label}"));
    pb.enable_steady_tick(Duration::from_millis(120));

    let result = load();

    pb.finish_and_clear();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topk_flag_rejects_zero() {
        let parsed = Cli::try_parse_from(["topicsim", "score", "--input", "out.json", "--topk", "0"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_topk_flag_accepts_positive() {
        let cli = Cli::try_parse_from(["topicsim", "score", "--input", "out.json", "--topk", "5"])
            .unwrap();
        match cli.command {
            Commands::Score { topk, .. } => assert_eq!(topk, Some(5)),
            Commands::Models => panic!("expected score command"),
        }
    }
}
