use std::fs;
use std::io;
use std::path::PathBuf;

use log::debug;

use crate::analyzer::CssAnalyzer;
use crate::cli::{AnalyzeArgs, Verbosity};
use crate::config::{AnalysisOptions, UndineConfig};
use crate::errors::UndineError;
use crate::models::AnalysisResult;
use crate::output::OutputFormatter;

/// Command handler for the analyze command
pub struct AnalyzeCommand {
    formatter: Box<dyn OutputFormatter>,
    verbosity: Verbosity,
}

impl AnalyzeCommand {
    /// Create a new analyze command handler
    pub fn new(formatter: Box<dyn OutputFormatter>, verbosity: Verbosity) -> Self {
        Self {
            formatter,
            verbosity,
        }
    }

    /// Execute the analyze command, returning the process exit code
    pub fn execute(
        &self,
        args: AnalyzeArgs,
        files: Vec<PathBuf>,
        config: &UndineConfig,
    ) -> Result<i32, UndineError> {
        // Paths given to the subcommand win over the top-level ones
        let files = if !args.files.is_empty() {
            args.files.clone()
        } else {
            files
        };
        if files.is_empty() {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no stylesheet given").into());
        }

        let options = merge_options(&args, config);
        let analyzer = CssAnalyzer::new(options);

        let mut reports = Vec::new();
        let mut exit_code = 0;
        for file in &files {
            let source = fs::read_to_string(file)?;
            let name = file.display().to_string();
            debug!("analyzing {} ({} bytes)", name, source.len());

            let result = analyzer.analyze(&source, Some(&name))?;
            exit_code = exit_code.max(severity_exit_code(&result));
            reports.push(self.formatter.format_analysis(&result, Some(&name)));
        }

        let report = reports.join("\n");
        match &args.output {
            Some(path) => {
                fs::write(path, &report)?;
                if self.verbosity >= Verbosity::Normal {
                    println!("Report written to {}", path.display());
                }
            }
            None => println!("{}", report),
        }

        Ok(exit_code)
    }
}

/// Apply CLI overrides on top of the loaded configuration
fn merge_options(args: &AnalyzeArgs, config: &UndineConfig) -> AnalysisOptions {
    let mut options = config.analysis_options();

    if args.no_layout {
        options.checks.layout = false;
    }
    if args.no_maintainability {
        options.checks.maintainability = false;
    }
    if args.no_performance {
        options.checks.performance = false;
    }
    if args.no_accessibility {
        options.checks.accessibility = false;
    }
    if args.no_compatibility {
        options.checks.compatibility = false;
    }

    if let Some(max_file_size) = args.max_file_size {
        options.thresholds.max_file_size = max_file_size;
    }
    if let Some(max_selectors) = args.max_selectors {
        options.thresholds.max_selectors = max_selectors;
    }
    if let Some(max_nesting) = args.max_nesting {
        options.thresholds.max_nesting = max_nesting;
    }

    if let Some(browsers) = &args.browsers {
        options.browsers = Some(browsers.clone());
    }

    options
}

/// Exit code convention: 2 for errors, 1 for warnings, 0 otherwise
fn severity_exit_code(result: &AnalysisResult) -> i32 {
    if result.summary.error_count > 0 {
        2
    } else if result.summary.warning_count > 0 {
        1
    } else {
        0
    }
}
