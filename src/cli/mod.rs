//! Command-line interface for Undine

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::models::IssueKind;

/// Verbosity level for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd)]
pub enum Verbosity {
    /// Quiet mode - only show errors
    Quiet = 0,

    /// Normal mode - show errors and warnings
    Normal = 1,

    /// Verbose mode - show errors, warnings, and info
    Verbose = 2,

    /// Debug mode - show everything including debug info
    Debug = 3,
}

impl Default for Verbosity {
    fn default() -> Self {
        Self::Normal
    }
}

impl From<u8> for Verbosity {
    fn from(value: u8) -> Self {
        match value {
            0 => Self::Normal,
            1 => Self::Verbose,
            _ => Self::Debug,
        }
    }
}

/// Undine - Deep analysis for your stylesheets
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "🌊 Undine - Deep analysis for your stylesheets",
    long_about = "Undine parses a stylesheet into a rule model, runs layout, maintainability, performance, accessibility and compatibility checks over it, and reports scored findings with concrete fixes. Like the water spirit it is named for, Undine works below the surface: it reads the cascade the way a browser would and raises what it finds before your users do."
)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Stylesheets to analyze
    #[arg(name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Verbosity level (-v=verbose, -vv=debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (no banner or progress chatter)
    #[arg(short, long)]
    pub quiet: bool,

    /// Custom configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,
}

/// Commands that Undine can execute
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze stylesheets for issues (default command)
    #[command(visible_alias = "check")]
    Analyze(AnalyzeArgs),

    /// Apply high-confidence fixes to stylesheets
    Fix(FixArgs),
}

/// Arguments for the analyze command
#[derive(Args, Debug, Clone, Default)]
pub struct AnalyzeArgs {
    /// Output format (pretty, markdown or json)
    #[arg(long)]
    pub format: Option<String>,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,

    /// Skip the flexbox, grid and positioning checks
    #[arg(long)]
    pub no_layout: bool,

    /// Skip the specificity and selector hygiene checks
    #[arg(long)]
    pub no_maintainability: bool,

    /// Skip the stylesheet size and nesting checks
    #[arg(long)]
    pub no_performance: bool,

    /// Skip the contrast, font size and focus checks
    #[arg(long)]
    pub no_accessibility: bool,

    /// Skip the browser support checks
    #[arg(long)]
    pub no_compatibility: bool,

    /// Target browsers for the compatibility checks
    #[arg(long, value_delimiter = ',')]
    pub browsers: Option<Vec<String>>,

    /// Stylesheet size in bytes before a warning is raised
    #[arg(long)]
    pub max_file_size: Option<usize>,

    /// Rule count before a warning is raised
    #[arg(long)]
    pub max_selectors: Option<usize>,

    /// Selector nesting depth before a warning is raised
    #[arg(long)]
    pub max_nesting: Option<usize>,

    /// Stylesheets to analyze
    #[arg(name = "FILE")]
    pub files: Vec<PathBuf>,
}

/// Arguments for the fix command
#[derive(Args, Debug, Clone)]
pub struct FixArgs {
    /// Minimum confidence a fix needs before it is applied
    #[arg(long, default_value_t = 70)]
    pub confidence_threshold: u8,

    /// Only apply fixes for these issue kinds (kebab-case, comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub kinds: Option<Vec<IssueKind>>,

    /// Output format for the fix report (pretty, markdown or json)
    #[arg(long)]
    pub format: Option<String>,

    /// Write the fixed stylesheet to this file
    #[arg(short = 'o', long, conflicts_with = "write")]
    pub output: Option<PathBuf>,

    /// Rewrite the stylesheet in place
    #[arg(short, long)]
    pub write: bool,

    /// Show the fix audit without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Stylesheets to fix
    #[arg(name = "FILE")]
    pub files: Vec<PathBuf>,
}
