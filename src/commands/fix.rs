use std::fs;
use std::io;
use std::path::PathBuf;

use log::debug;

use crate::analyzer::CssAnalyzer;
use crate::cli::{FixArgs, Verbosity};
use crate::config::UndineConfig;
use crate::errors::UndineError;
use crate::fixes::{self, FixOptions};
use crate::output::OutputFormatter;

/// Command handler for the fix command
pub struct FixCommand {
    formatter: Box<dyn OutputFormatter>,
    verbosity: Verbosity,
}

impl FixCommand {
    /// Create a new fix command handler
    pub fn new(formatter: Box<dyn OutputFormatter>, verbosity: Verbosity) -> Self {
        Self {
            formatter,
            verbosity,
        }
    }

    /// Execute the fix command, returning the process exit code
    ///
    /// Without a destination the fixed stylesheet streams to stdout;
    /// `--write` and `-o` persist it and print the audit instead.
    pub fn execute(
        &self,
        args: FixArgs,
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
        if args.output.is_some() && files.len() > 1 {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "--output needs exactly one input file",
            )
            .into());
        }

        let analyzer = CssAnalyzer::new(config.analysis_options());
        let fix_options = FixOptions {
            confidence_threshold: args.confidence_threshold,
            kinds: args.kinds.clone(),
        };

        let mut audits = Vec::new();
        for file in &files {
            let source = fs::read_to_string(file)?;
            let name = file.display().to_string();

            let analysis = analyzer.analyze(&source, Some(&name))?;
            let result = fixes::apply_fixes(&source, &analysis.issues, &fix_options);
            debug!(
                "{}: {} of {} eligible fixes applied",
                name, result.fixed_count, result.total_issues
            );

            if args.dry_run {
                audits.push(self.formatter.format_fixes(&result));
                continue;
            }

            if args.write {
                fs::write(file, &result.fixed_source)?;
                if self.verbosity >= Verbosity::Normal {
                    println!("Fixed stylesheet written to {}", name);
                }
                audits.push(self.formatter.format_fixes(&result));
            } else if let Some(target) = &args.output {
                fs::write(target, &result.fixed_source)?;
                if self.verbosity >= Verbosity::Normal {
                    println!("Fixed stylesheet written to {}", target.display());
                }
                audits.push(self.formatter.format_fixes(&result));
            } else {
                // Filter mode: the rewritten stylesheet is the output
                print!("{}", result.fixed_source);
            }
        }

        if !audits.is_empty() {
            println!("{}", audits.join("\n"));
        }

        Ok(0)
    }
}
