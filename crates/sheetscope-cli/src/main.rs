//! Sheetscope CLI - dataset profiling, health scoring and chart planning.

mod cli;
mod commands;
mod loader;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Analyze { input, output } => commands::analyze::run(input, output),
        Commands::Profile { input, column } => commands::profile::run(input, column),
        Commands::Health { input } => commands::health::run(input),
        Commands::Charts { input, output } => commands::charts::run(input, output),
        Commands::Classify { input, full } => commands::classify::run(input, full),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
