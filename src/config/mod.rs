//! Configuration management for Undine

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::{ConfigError, UndineError};

/// Configuration provider trait
pub trait ConfigProvider {
    /// Load configuration from the given directory
    fn load_config(&self, base_dir: &Path) -> Result<UndineConfig, UndineError>;

    /// Load configuration from one specific file
    fn load_file(&self, path: &Path) -> Result<UndineConfig, UndineError>;
}

/// Which detector families run during analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckToggles {
    /// Flexbox, grid and positioning checks
    pub layout: bool,

    /// Specificity conflict and selector hygiene checks
    pub maintainability: bool,

    /// Stylesheet size and selector complexity checks
    pub performance: bool,

    /// Contrast, font size and focus checks
    pub accessibility: bool,

    /// Browser support checks
    pub compatibility: bool,
}

impl Default for CheckToggles {
    fn default() -> Self {
        Self {
            layout: true,
            maintainability: true,
            performance: true,
            accessibility: true,
            compatibility: true,
        }
    }
}

/// Numeric limits the performance checks report against
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Stylesheet size in bytes before a warning is raised
    pub max_file_size: usize,

    /// Rule count before a warning is raised
    pub max_selectors: usize,

    /// Selector nesting depth before a warning is raised
    pub max_nesting: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_file_size: 500_000,
            max_selectors: 4_000,
            max_nesting: 5,
        }
    }
}

/// Restricts analysis to a subset of rules and declarations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopeFilter {
    /// Substrings a selector must contain (empty means all)
    pub include_selectors: Vec<String>,

    /// Substrings that exclude a selector
    pub exclude_selectors: Vec<String>,

    /// Substrings a property name must contain (empty means all)
    pub include_properties: Vec<String>,

    /// Substrings that exclude a property name
    pub exclude_properties: Vec<String>,
}

impl ScopeFilter {
    /// Whether a rule with this selector is in scope
    pub fn matches_selector(&self, selector: &str) -> bool {
        Self::matches(selector, &self.include_selectors, &self.exclude_selectors)
    }

    /// Whether a declaration with this property is in scope
    pub fn matches_property(&self, property: &str) -> bool {
        Self::matches(property, &self.include_properties, &self.exclude_properties)
    }

    fn matches(text: &str, include: &[String], exclude: &[String]) -> bool {
        if exclude.iter().any(|pattern| text.contains(pattern.as_str())) {
            return false;
        }
        include.is_empty() || include.iter().any(|pattern| text.contains(pattern.as_str()))
    }
}

/// Everything the analyzer needs to know about how to run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisOptions {
    /// Which detector families are enabled
    #[serde(default)]
    pub checks: CheckToggles,

    /// Numeric limits for the performance checks
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Target browsers for compatibility checks (None disables them)
    #[serde(default)]
    pub browsers: Option<Vec<String>>,

    /// Optional selector filter applied before detection
    #[serde(default)]
    pub scope: Option<ScopeFilter>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default report format (pretty, markdown or json)
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "pretty".to_string(),
        }
    }
}

/// Main configuration for Undine
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UndineConfig {
    /// Which detector families are enabled
    #[serde(default)]
    pub checks: CheckToggles,

    /// Numeric limits for the performance checks
    #[serde(default)]
    pub thresholds: Thresholds,

    /// Target browsers for compatibility checks
    #[serde(default)]
    pub browsers: Option<Vec<String>>,

    /// Optional selector filter applied before detection
    #[serde(default)]
    pub scope: Option<ScopeFilter>,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,
}

impl UndineConfig {
    /// Collect the analyzer-facing parts of the configuration
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            checks: self.checks.clone(),
            thresholds: self.thresholds.clone(),
            browsers: self.browsers.clone(),
            scope: self.scope.clone(),
        }
    }
}

/// TOML configuration provider
pub struct TomlConfigProvider;

impl Default for TomlConfigProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl TomlConfigProvider {
    /// Create a new TOML configuration provider
    pub fn new() -> Self {
        Self
    }
}

impl ConfigProvider for TomlConfigProvider {
    fn load_config(&self, base_dir: &Path) -> Result<UndineConfig, UndineError> {
        // Look for .undine.toml in the given directory and parents
        let mut current_dir = Some(base_dir);

        while let Some(dir) = current_dir {
            let config_path = dir.join(".undine.toml");

            if config_path.exists() {
                return read_config(&config_path);
            }

            // Move up to parent directory
            current_dir = dir.parent();
        }

        // No config found, return defaults
        Ok(UndineConfig::default())
    }

    fn load_file(&self, path: &Path) -> Result<UndineConfig, UndineError> {
        read_config(path)
    }
}

fn read_config(path: &Path) -> Result<UndineConfig, UndineError> {
    let content = std::fs::read_to_string(path).map_err(|err| ConfigError::LoadError {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;

    let config = toml::from_str(&content).map_err(ConfigError::Toml)?;
    Ok(config)
}
