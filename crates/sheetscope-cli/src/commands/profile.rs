//! Profile command - show per-column profiles.

use colored::Colorize;
use sheetscope::profile::{ColumnDetail, find_column};
use sheetscope::{ColumnProfiler, EnhancedColumnStats};

use super::load_input;
use crate::cli::InputArgs;

pub fn run(input: InputArgs, column: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let (dataset, _source, config) = load_input(&input)?;

    let profiler = ColumnProfiler::with_config(config.profiler).with_limits(config.input);
    let mut stats = profiler.profile_dataset(&dataset)?;

    if let Some(ref name) = column {
        let selected = find_column(&stats, name)
            .cloned()
            .ok_or_else(|| format!("Column not found: {}", name))?;
        stats = vec![selected];
    }

    if input.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!(
        "{} {} ({} rows)",
        "Profiling".cyan().bold(),
        input.file.display().to_string().white(),
        dataset.row_count()
    );
    println!();

    for s in &stats {
        print_column(s);
    }

    Ok(())
}

fn print_column(s: &EnhancedColumnStats) {
    println!(
        "{:24} {:10} {} unique, {} null ({:.1}%)",
        s.name.white().bold(),
        s.inferred_type().to_string().cyan(),
        s.unique_values,
        s.null_count,
        s.null_percentage()
    );

    match &s.detail {
        ColumnDetail::Numeric(n) => {
            println!(
                "    min {} / max {} / mean {:.2} / median {:.2} / sd {:.2}",
                n.min, n.max, n.mean, n.median, n.standard_deviation
            );
            if let Some(outliers) = n.outliers.as_ref().filter(|o| o.count > 0) {
                println!(
                    "    {} outliers: {:?}",
                    outliers.count.to_string().yellow(),
                    outliers.values
                );
            }
        }
        ColumnDetail::Date(d) => {
            let range = &d.date_range;
            println!("    {} to {} ({} days)", range.min, range.max, range.span);
        }
        ColumnDetail::Category(c) => {
            let top: Vec<String> = c
                .top_categories
                .iter()
                .take(5)
                .map(|t| format!("{} ({:.1}%)", t.value, t.percentage))
                .collect();
            println!("    top: {}", top.join(", "));
        }
        ColumnDetail::Boolean(b) => {
            println!("    true {} / false {}", b.true_count, b.false_count);
        }
        ColumnDetail::Text(t) => {
            println!(
                "    length {}..{} (avg {:.1})",
                t.min_length, t.max_length, t.avg_length
            );
        }
        ColumnDetail::Mixed => {}
    }

    println!(
        "    quality: completeness {:.2}, consistency {:.2}, uniqueness {:.2}",
        s.quality.completeness, s.quality.consistency, s.quality.uniqueness
    );
}
