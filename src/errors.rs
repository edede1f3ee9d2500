use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Undine
#[derive(Debug, Error)]
pub enum UndineError {
    /// The input stylesheet was empty or whitespace-only
    #[error("Stylesheet is empty")]
    EmptyInput,

    /// Parsing errors
    #[error("Parse error: {0}")]
    Parse(#[from] ParseFailure),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Configuration related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Failed to load config from {path}: {message}")]
    LoadError { path: PathBuf, message: String },

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// A single syntax problem found while parsing a stylesheet.
///
/// Lines and columns are 1-based; `0, 0` means the position is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("syntax error at {line}:{column}: {message}")]
pub struct SyntaxError {
    /// Human-readable description of the problem
    pub message: String,

    /// Line number (1-based, 0 when unknown)
    pub line: usize,

    /// Column number (1-based, 0 when unknown)
    pub column: usize,
}

impl SyntaxError {
    /// Create a syntax error at a known position
    pub fn new(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            message: message.into(),
            line,
            column,
        }
    }
}

/// Strict-parse failure carrying every syntax error that was found.
///
/// The partial rule model survives alongside the errors so callers can
/// still report degraded metrics for the parts that did parse.
#[derive(Debug, Clone, Error)]
#[error("stylesheet has {} syntax error(s)", errors.len())]
pub struct ParseFailure {
    /// All syntax errors collected during the parse, in source order
    pub errors: Vec<SyntaxError>,

    /// Rules recovered from the valid portions of the source
    pub partial: crate::models::Stylesheet,
}
