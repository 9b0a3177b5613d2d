//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Sheetscope: profile, score and chart tabular datasets
#[derive(Parser)]
#[command(name = "sheetscope")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging to stderr)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Input options shared by every subcommand.
#[derive(Args, Clone, Debug)]
pub struct InputArgs {
    /// Path to the data file (CSV/TSV or JSON)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// JSON file overriding analysis thresholds
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Field delimiter for delimited files (default: auto-detect)
    #[arg(short, long)]
    pub delimiter: Option<char>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full pipeline: profile, health, charts and classification
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Write the JSON report to this path instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show per-column profiles
    Profile {
        #[command(flatten)]
        input: InputArgs,

        /// Only show this column
        #[arg(long)]
        column: Option<String>,
    },

    /// Show the health score breakdown, issues and recommendations
    Health {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Generate chart specifications
    Charts {
        #[command(flatten)]
        input: InputArgs,

        /// Write the chart specifications to this path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Guess the dataset's domain
    Classify {
        #[command(flatten)]
        input: InputArgs,

        /// Use every row instead of the leading sample
        #[arg(long)]
        full: bool,
    },
}
