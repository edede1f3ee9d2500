use std::path::{Path, PathBuf};

use crate::cli::{AnalyzeArgs, FixArgs, Verbosity};
use crate::commands::{AnalyzeCommand, FixCommand};
use crate::config::{ConfigProvider, UndineConfig};
use crate::errors::UndineError;
use crate::output;

/// Core application that orchestrates the workflow of Undine
pub struct UndineApp<C: ConfigProvider> {
    config_provider: C,
    config_file: Option<PathBuf>,
    verbosity: Verbosity,
}

impl<C: ConfigProvider> UndineApp<C> {
    /// Create a new instance of UndineApp
    pub fn new(config_provider: C) -> Self {
        Self {
            config_provider,
            config_file: None,
            verbosity: Verbosity::default(),
        }
    }

    /// Set the verbosity level
    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Use an explicit config file instead of searching parent directories
    pub fn with_config_file(mut self, path: Option<PathBuf>) -> Self {
        self.config_file = path;
        self
    }

    /// Run the analyze command
    pub fn analyze(&self, args: AnalyzeArgs, files: Vec<PathBuf>) -> Result<i32, UndineError> {
        // Load configuration
        let config = self.load_config(&args.files, &files)?;

        // Create an AnalyzeCommand instance and delegate execution
        let formatter = output::formatter_for(&self.output_format(args.format.as_deref(), &config));
        let analyze_command = AnalyzeCommand::new(formatter, self.verbosity);

        analyze_command.execute(args, files, &config)
    }

    /// Run the fix command
    pub fn fix(&self, args: FixArgs, files: Vec<PathBuf>) -> Result<i32, UndineError> {
        // Load configuration
        let config = self.load_config(&args.files, &files)?;

        // Create a FixCommand instance and delegate execution
        let formatter = output::formatter_for(&self.output_format(args.format.as_deref(), &config));
        let fix_command = FixCommand::new(formatter, self.verbosity);

        fix_command.execute(args, files, &config)
    }

    // Helper methods

    /// Resolve the output format, letting the CLI flag win over the config default
    fn output_format(&self, flag: Option<&str>, config: &UndineConfig) -> String {
        flag.map(str::to_string)
            .unwrap_or_else(|| config.output.format.clone())
    }

    /// Load configuration starting from the first input file
    fn load_config(
        &self,
        command_files: &[PathBuf],
        files: &[PathBuf],
    ) -> Result<UndineConfig, UndineError> {
        if let Some(path) = &self.config_file {
            return self.config_provider.load_file(path);
        }

        // Use the first file's directory as base directory or current dir if empty
        let base_dir = command_files
            .iter()
            .chain(files.iter())
            .next()
            .and_then(|file| file.parent())
            .filter(|dir| !dir.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        self.config_provider.load_config(base_dir)
    }
}
