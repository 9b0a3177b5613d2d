//! Charts command - generate chart specifications.

use std::fs;
use std::path::PathBuf;

use colored::Colorize;
use sheetscope::{ChartGenerator, ColumnProfiler};

use super::load_input;
use crate::cli::InputArgs;

pub fn run(input: InputArgs, output: Option<PathBuf>) -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, _source, config) = load_input(&input)?;

    let stats = ColumnProfiler::with_config(config.profiler)
        .with_limits(config.input)
        .profile_dataset(&dataset)?;
    let charts = ChartGenerator::with_config(config.charts).generate(&stats, &dataset.rows);

    if let Some(path) = output {
        fs::write(&path, serde_json::to_string_pretty(&charts)?)?;
        println!(
            "{} {} charts to {}",
            "Saved".green().bold(),
            charts.len(),
            path.display().to_string().white()
        );
        return Ok(());
    }

    if input.json {
        println!("{}", serde_json::to_string_pretty(&charts)?);
        return Ok(());
    }

    if charts.is_empty() {
        println!("{}", "No chartable columns found.".yellow());
        return Ok(());
    }

    println!(
        "{} {}",
        "Charts for".cyan().bold(),
        input.file.display().to_string().white()
    );
    println!();
    for chart in &charts {
        println!(
            "  {:10} {} ({} points)",
            format!("{:?}", chart.chart_type).to_lowercase().cyan(),
            chart.title.white().bold(),
            chart.data.len()
        );
        if let Some(ref explanation) = chart.explanation {
            println!("             {}", explanation.dimmed());
        }
    }

    Ok(())
}
