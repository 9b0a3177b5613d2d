//! Health command - show the health breakdown, issues and recommendations.

use colored::Colorize;
use sheetscope::{ColumnProfiler, HealthScoreCalculator, Severity};

use super::{colored_score, colored_severity, load_input};
use crate::cli::InputArgs;

pub fn run(input: InputArgs) -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, _source, config) = load_input(&input)?;

    let stats = ColumnProfiler::with_config(config.profiler)
        .with_limits(config.input)
        .profile_dataset(&dataset)?;
    let health = HealthScoreCalculator::with_config(config.health).calculate(
        &stats,
        dataset.row_count(),
        &dataset.headers,
    )?;

    if input.json {
        println!("{}", serde_json::to_string_pretty(&health)?);
        return Ok(());
    }

    let b = &health.breakdown;
    println!(
        "{} {}",
        "Health of".cyan().bold(),
        input.file.display().to_string().white()
    );
    println!();
    println!("Overall:        {}/100", colored_score(b.overall).bold());
    println!("  Completeness: {}", colored_score(b.completeness));
    println!("  Consistency:  {}", colored_score(b.consistency));
    println!("  Uniqueness:   {}", colored_score(b.uniqueness));
    println!("  Headers:      {}", colored_score(b.header_quality));
    println!("  Anomalies:    {}", colored_score(b.anomaly_score));
    println!();

    if health.issues.is_empty() {
        println!("{}", "No issues found - data looks clean!".green());
        return Ok(());
    }

    println!(
        "{} ({} high, {} medium, {} low)",
        "Issues:".yellow().bold(),
        health.count_by_severity(Severity::High).to_string().red(),
        health.count_by_severity(Severity::Medium).to_string().yellow(),
        health.count_by_severity(Severity::Low).to_string().blue()
    );
    for issue in &health.issues {
        println!("  [{}] {}", colored_severity(issue.severity), issue.message);
    }
    println!();

    println!("{}", "Recommendations:".yellow().bold());
    for recommendation in &health.recommendations {
        println!("  - {}", recommendation);
    }

    Ok(())
}
