// Colored terminal output for metric scores.
//
// High similarity between topics means they repeat each other, so scores
// are colored like warnings: the closer to 1.0, the hotter the color.

use colored::{ColoredString, Colorize};

use super::MetricScore;

/// Display a table of metric results in the terminal.
pub fn display_scores(scores: &[MetricScore], topic_count: usize) {
    if scores.is_empty() {
        println!("No metrics selected.");
        return;
    }

    println!(
        "\n{}",
        format!("=== Topic Similarity ({topic_count} topics) ===").bold()
    );
    println!();

    println!("  {:<32} {:>8}", "Metric".dimmed(), "Score".dimmed());
    println!("  {}", "-".repeat(42).dimmed());

    for score in scores {
        match &score.outcome {
            Ok(value) => println!("  {:<32} {:>8}", score.name, colorize_score(*value)),
            Err(err) => println!("  {:<32} {:>8}  {}", score.name, "error".red(), err),
        }
    }

    println!();
    println!(
        "  {}",
        "Higher scores mean more redundant topics.".dimmed()
    );
}

/// Color a similarity score by how redundant it suggests the topics are.
fn colorize_score(value: f64) -> ColoredString {
    let text = format!("{value:.4}");
    if value >= 0.75 {
        text.bright_red()
    } else if value >= 0.4 {
        text.bright_yellow()
    } else {
        text.bright_green()
    }
}

/// Display the embedding tables a catalog directory offers.
pub fn display_models(dir: &std::path::Path, names: &[String]) {
    println!("Embedding tables in {}:", dir.display());
    if names.is_empty() {
        println!("  {}", "(none found, add <name>.txt word2vec files)".dimmed());
        return;
    }
    for name in names {
        println!("  {}", name.bold());
    }
}
