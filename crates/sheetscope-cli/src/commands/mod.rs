//! CLI command implementations.

pub mod analyze;
pub mod charts;
pub mod classify;
pub mod health;
pub mod profile;

use std::fs;

use colored::{ColoredString, Colorize};
use sheetscope::{AnalysisConfig, Dataset, Severity};

use crate::cli::InputArgs;
use crate::loader::{SourceMetadata, load_dataset};

/// Load the dataset and the analysis configuration named by the input flags.
pub(crate) fn load_input(
    input: &InputArgs,
) -> Result<(Dataset, SourceMetadata, AnalysisConfig), Box<dyn std::error::Error>> {
    if !input.file.exists() {
        return Err(format!("File not found: {}", input.file.display()).into());
    }

    let config = match &input.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
            AnalysisConfig::from_json(&text)?
        }
        None => AnalysisConfig::default(),
    };
    config.validate()?;

    let (dataset, source) = load_dataset(&input.file, input.delimiter)?;
    Ok((dataset, source, config))
}

/// Color a 0-100 score: green when healthy, yellow when fair, red otherwise.
pub(crate) fn colored_score(score: f64) -> ColoredString {
    let text = format!("{:.0}", score);
    if score >= 80.0 {
        text.green()
    } else if score >= 50.0 {
        text.yellow()
    } else {
        text.red()
    }
}

pub(crate) fn colored_severity(severity: Severity) -> ColoredString {
    match severity {
        Severity::High => severity.label().red().bold(),
        Severity::Medium => severity.label().yellow(),
        Severity::Low => severity.label().blue(),
    }
}
