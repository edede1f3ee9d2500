mod analyzer;
mod app;
mod cli;
mod commands;
mod config;
mod detectors;
mod errors;
mod fixes;
mod models;
mod output;
mod parser;
mod specificity;

use clap::Parser;
use cli::{AnalyzeArgs, Cli, Commands, Verbosity};

fn main() {
    // Initialize logger
    env_logger::init();

    // Parse command line arguments
    let cli = Cli::parse();

    // Convert verbosity flag
    let verbosity = if cli.quiet {
        Verbosity::Quiet
    } else {
        Verbosity::from(cli.verbose)
    };

    // Print a welcome message if not in quiet mode. It goes to stderr so
    // piped report output stays clean.
    if verbosity != Verbosity::Quiet {
        eprintln!("🌊 Undine - Deep analysis for your stylesheets");
    }

    // Create the Undine app
    let config_provider = config::TomlConfigProvider::new();
    let app = app::UndineApp::new(config_provider)
        .with_verbosity(verbosity)
        .with_config_file(cli.config.clone());

    // Determine which command to run, defaulting to analyze
    let outcome = match cli
        .command
        .unwrap_or_else(|| Commands::Analyze(AnalyzeArgs::default()))
    {
        Commands::Analyze(args) => app.analyze(args, cli.files),
        Commands::Fix(args) => app.fix(args, cli.files),
    };

    let code = match outcome {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {}", err);
            3
        }
    };

    std::process::exit(code);
}
