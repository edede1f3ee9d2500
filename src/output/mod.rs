//! Output formatting for Undine

pub mod markdown;
pub mod terminal;

pub use markdown::MarkdownFormatter;
pub use terminal::PrettyFormatter;

use crate::models::{AnalysisResult, FixResult};

/// Trait for rendering analysis and fix results
pub trait OutputFormatter {
    /// Format a full analysis report
    fn format_analysis(&self, result: &AnalysisResult, file: Option<&str>) -> String;

    /// Format the outcome of an auto-fix pass
    fn format_fixes(&self, result: &FixResult) -> String;
}

/// Resolve a formatter by name, falling back to the pretty one
pub fn formatter_for(format: &str) -> Box<dyn OutputFormatter> {
    match format {
        "json" => Box::new(JsonFormatter),
        "markdown" | "md" => Box::new(MarkdownFormatter),
        _ => Box::new(PrettyFormatter::new()),
    }
}

/// JSON formatter for machine-readable output
pub struct JsonFormatter;

impl OutputFormatter for JsonFormatter {
    fn format_analysis(&self, result: &AnalysisResult, _file: Option<&str>) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_fixes(&self, result: &FixResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }
}

/// File size in KB rounded to two decimals
fn kilobytes(bytes: usize) -> f64 {
    (bytes as f64 / 1024.0 * 100.0).round() / 100.0
}
