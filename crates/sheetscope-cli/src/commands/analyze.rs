//! Analyze command - run the full pipeline and emit the report.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use serde_json::json;
use sheetscope::{Severity, Sheetscope};

use super::{colored_score, colored_severity, load_input};
use crate::cli::InputArgs;

pub fn run(input: InputArgs, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, source, config) = load_input(&input)?;

    if !input.json && output.is_none() {
        println!(
            "{} {}",
            "Analyzing".cyan().bold(),
            input.file.display().to_string().white()
        );
    }

    let report = Sheetscope::with_config(config).analyze(&dataset)?;

    if let Some(path) = output {
        let document = json!({ "source": source, "report": report });
        fs::write(&path, serde_json::to_string_pretty(&document)?)?;
        if !input.json {
            println!(
                "{} {}",
                "Saved to".green().bold(),
                path.display().to_string().white()
            );
        }
        return Ok(());
    }

    if input.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    let summary = &report.summary;
    println!(
        "{} rows, {} columns ({})",
        summary.total_rows.to_string().white().bold(),
        summary.total_columns.to_string().white().bold(),
        source.format
    );

    let types: Vec<String> = summary
        .columns_by_type
        .iter()
        .map(|(kind, count)| format!("{} {}", count, kind))
        .collect();
    if !types.is_empty() {
        println!("Column types: {}", types.join(", "));
    }
    println!();

    println!(
        "Health score: {}/100",
        colored_score(summary.health_score).bold()
    );
    println!(
        "Found {} issues ({} high, {} medium, {} low)",
        report.health.issues.len().to_string().white().bold(),
        summary.issues_by_severity.high.to_string().red(),
        summary.issues_by_severity.medium.to_string().yellow(),
        summary.issues_by_severity.low.to_string().blue()
    );

    let serious: Vec<_> = report
        .health
        .issues
        .iter()
        .filter(|i| i.severity == Severity::High)
        .collect();
    for issue in serious {
        println!("  [{}] {}", colored_severity(issue.severity), issue.message);
    }
    println!();

    match &report.classification {
        Some(classification) => println!(
            "Domain: {} ({:.0}% confidence)",
            classification.category.label().cyan().bold(),
            classification.confidence * 100.0
        ),
        None => println!("Domain: {}", "unavailable".dimmed()),
    }
    println!(
        "Generated {} charts",
        report.charts.len().to_string().white().bold()
    );

    if !report.health.recommendations.is_empty() {
        println!();
        println!("{}", "Recommendations:".yellow().bold());
        for recommendation in &report.health.recommendations {
            println!("  - {}", recommendation);
        }
    } else {
        println!();
        println!("{}", "No issues found - data looks clean!".green());
    }

    Ok(())
}
