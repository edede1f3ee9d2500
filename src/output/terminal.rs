//! Colored terminal reports

use colored::Colorize;

use super::{kilobytes, OutputFormatter};
use crate::models::{AnalysisResult, FixResult, Severity};

/// Default implementation that uses pretty formatting with colors
#[derive(Clone)]
pub struct PrettyFormatter {
    /// Whether to use emojis
    use_emoji: bool,
}

impl Default for PrettyFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl PrettyFormatter {
    /// Create a new PrettyFormatter
    pub fn new() -> Self {
        Self { use_emoji: true }
    }
}

impl OutputFormatter for PrettyFormatter {
    fn format_analysis(&self, result: &AnalysisResult, file: Option<&str>) -> String {
        let mut output = String::new();
        let separator = "━".repeat(60).dimmed();

        let title = match file {
            Some(name) => format!("CSS analysis: {}", name),
            None => "CSS analysis".to_string(),
        };

        output.push_str(&format!("\n{}\n\n", separator));
        if self.use_emoji {
            output.push_str(&format!("🎨 {}\n", title.bold()));
        } else {
            output.push_str(&format!("{}\n", title.bold()));
        }
        output.push_str(&format!("\n{}\n\n", separator));

        // Summary line with colored counts
        let summary = &result.summary;
        let mut counts = Vec::new();
        if summary.error_count > 0 {
            counts.push(format!("{} {}", summary.error_count, "errors".red().bold()));
        }
        if summary.warning_count > 0 {
            counts.push(format!(
                "{} {}",
                summary.warning_count,
                "warnings".yellow().bold()
            ));
        }
        if summary.info_count > 0 {
            counts.push(format!("{} {}", summary.info_count, "info".blue().bold()));
        }
        if summary.hint_count > 0 {
            counts.push(format!("{} {}", summary.hint_count, "hints".cyan().bold()));
        }

        if counts.is_empty() {
            output.push_str(&format!("  {} No issues detected!\n", "✨".green()));
        } else {
            output.push_str(&format!("  📊 Found: {}\n", counts.join(", ")));
        }

        for issue in &result.issues {
            let tag = match issue.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow().bold(),
                Severity::Info => "info".blue().bold(),
                Severity::Hint => "hint".cyan(),
            };
            output.push_str(&format!(
                "\n  {} {} {}\n",
                tag,
                format!("[{}]", issue.kind).dimmed(),
                issue.message
            ));

            let mut place = Vec::new();
            if let Some(selector) = &issue.location.selector {
                place.push(selector.clone());
            }
            if let Some(line) = issue.location.line {
                if line > 0 {
                    place.push(format!("line {}", line));
                }
            }
            if !place.is_empty() {
                output.push_str(&format!("      {}\n", place.join(", ").dimmed()));
            }
            if let Some(description) = &issue.description {
                output.push_str(&format!("      {}\n", description.dimmed()));
            }
            if let Some(fix) = &issue.fix {
                output.push_str(&format!(
                    "      🔧 {} ({}% confidence)\n",
                    fix.description, fix.confidence
                ));
            }
        }

        // Metrics footer
        output.push_str(&format!("\n{}\n\n", separator));
        let metrics = &result.metrics;
        output.push_str(&format!(
            "  📐 {} selectors, {} declarations, {} KB\n",
            metrics.selectors_count,
            metrics.properties_count,
            kilobytes(metrics.file_size_bytes)
        ));
        output.push_str(&format!(
            "  📈 Specificity: max {}, average {}\n",
            metrics.max_specificity, metrics.avg_specificity
        ));

        if !result.suggestions.is_empty() {
            output.push_str("\n  💡 Suggestions:\n");
            for suggestion in result
                .suggestions
                .optimizations
                .iter()
                .chain(&result.suggestions.refactoring)
                .chain(&result.suggestions.modernization)
            {
                output.push_str(&format!("     - {}\n", suggestion));
            }
        }

        output.push_str(&format!("\n{}\n", separator));
        output
    }

    fn format_fixes(&self, result: &FixResult) -> String {
        let mut output = String::new();
        let separator = "━".repeat(60).dimmed();

        output.push_str(&format!("\n{}\n\n", separator));
        if self.use_emoji {
            output.push_str(&format!("🔧 {}\n", "Auto-fix".bold()));
        } else {
            output.push_str(&format!("{}\n", "Auto-fix".bold()));
        }
        output.push_str(&format!("\n{}\n\n", separator));

        output.push_str(&format!(
            "  📊 {} eligible: {} {}, {} {}\n",
            result.total_issues,
            result.fixed_count,
            "fixed".green().bold(),
            result.skipped_count,
            "skipped".yellow()
        ));

        for fix in &result.applied {
            output.push_str(&format!(
                "\n  {} {} ({}% confidence)\n",
                "✓".green(),
                fix.description,
                fix.confidence
            ));
            output.push_str(&format!("      {}\n", format!("[{}]", fix.kind).dimmed()));
        }

        if !result.skipped.is_empty() {
            output.push('\n');
            for skip in &result.skipped {
                output.push_str(&format!(
                    "  {} {} {}\n",
                    "⏭".yellow(),
                    format!("[{}]", skip.kind).dimmed(),
                    skip.reason
                ));
            }
        }

        output.push_str(&format!("\n{}\n", separator));
        output
    }
}
