//! Classify command - guess the dataset's domain.

use colored::Colorize;
use sheetscope::DatasetClassifier;

use super::load_input;
use crate::cli::InputArgs;

pub fn run(input: InputArgs, full: bool) -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, _source, config) = load_input(&input)?;

    let classifier = DatasetClassifier::with_config(config.classifier).with_limits(config.input);
    let classification = if full {
        classifier.classify(&dataset.headers, &dataset.rows)?
    } else {
        classifier.classify_sample(&dataset.headers, &dataset.rows)?
    };

    if input.json {
        println!("{}", serde_json::to_string_pretty(&classification)?);
        return Ok(());
    }

    println!(
        "Domain: {} ({:.0}% confidence)",
        classification.category.label().cyan().bold(),
        classification.confidence * 100.0
    );
    if !classification.matched_keywords.is_empty() {
        println!(
            "Matched headers: {}",
            classification.matched_keywords.join(", ")
        );
    }
    println!();

    println!("{}", "Scores:".yellow().bold());
    for score in classification.scores.iter().filter(|s| s.score > 0.0) {
        println!("  {:18} {:.1}", score.category.label(), score.score);
    }

    Ok(())
}
