//! Markdown reports for sharing analysis and fix results

use super::{kilobytes, OutputFormatter};
use crate::models::{AnalysisResult, FixResult, Issue, Severity};

/// Markdown formatter for shareable reports
pub struct MarkdownFormatter;

impl OutputFormatter for MarkdownFormatter {
    fn format_analysis(&self, result: &AnalysisResult, file: Option<&str>) -> String {
        let mut output = String::new();

        match file {
            Some(name) => output.push_str(&format!("📄 **CSS Analysis Report: {}**\n\n", name)),
            None => output.push_str("📄 **CSS Analysis Report**\n\n"),
        }

        let summary = &result.summary;
        output.push_str("## 📊 Summary\n");
        output.push_str(&format!("- **Total Issues**: {}\n", summary.total_issues));
        output.push_str(&format!("- **Errors**: {} 🔴\n", summary.error_count));
        output.push_str(&format!("- **Warnings**: {} 🟡\n", summary.warning_count));
        output.push_str(&format!("- **Info**: {} 🔵\n", summary.info_count));
        output.push_str(&format!("- **Hints**: {} 💡\n\n", summary.hint_count));

        let metrics = &result.metrics;
        output.push_str("## 📐 Metrics\n");
        output.push_str(&format!(
            "- **File Size**: {} KB\n",
            kilobytes(metrics.file_size_bytes)
        ));
        output.push_str(&format!("- **Selectors**: {}\n", metrics.selectors_count));
        output.push_str(&format!("- **Properties**: {}\n", metrics.properties_count));
        output.push_str(&format!(
            "- **Max Specificity**: {}\n",
            metrics.max_specificity
        ));
        output.push_str(&format!(
            "- **Avg Specificity**: {}\n\n",
            metrics.avg_specificity
        ));

        if result.issues.is_empty() {
            output.push_str(
                "## ✅ No Issues Found\n\nYour CSS code looks good! No problems detected.\n\n",
            );
        } else {
            output.push_str("## 🔍 Issues Found\n\n");
            let sections = [
                (Severity::Error, "🔴 Errors"),
                (Severity::Warning, "🟡 Warnings"),
                (Severity::Info, "🔵 Info"),
                (Severity::Hint, "💡 Hints"),
            ];
            for (severity, heading) in sections {
                let matching: Vec<&Issue> = result
                    .issues
                    .iter()
                    .filter(|issue| issue.severity == severity)
                    .collect();
                if matching.is_empty() {
                    continue;
                }
                output.push_str(&format!("### {} ({})\n\n", heading, matching.len()));
                for (index, issue) in matching.iter().enumerate() {
                    output.push_str(&format_issue(issue, index + 1));
                }
            }
        }

        let suggestions = &result.suggestions;
        if !suggestions.is_empty() {
            output.push_str("## 💡 Suggestions\n\n");
            let groups = [
                ("⚡ Performance Optimizations", &suggestions.optimizations),
                ("🔧 Code Refactoring", &suggestions.refactoring),
                ("🚀 Modernization", &suggestions.modernization),
            ];
            for (heading, entries) in groups {
                if entries.is_empty() {
                    continue;
                }
                output.push_str(&format!("### {}\n", heading));
                for entry in entries {
                    output.push_str(&format!("- {}\n", entry));
                }
                output.push('\n');
            }
        }

        output.push_str(&format!(
            "---\n*Analysis completed with undine v{}*",
            env!("CARGO_PKG_VERSION")
        ));
        output
    }

    fn format_fixes(&self, result: &FixResult) -> String {
        let mut output = String::from("# 🔧 CSS Auto-Fix Report\n\n");

        output.push_str("## 📊 Summary\n");
        output.push_str(&format!(
            "- **Total Issues Analyzed**: {}\n",
            result.total_issues
        ));
        output.push_str(&format!(
            "- **Successfully Fixed**: {} ✅\n",
            result.fixed_count
        ));
        output.push_str(&format!("- **Skipped**: {} ⏭️\n\n", result.skipped_count));

        if !result.applied.is_empty() {
            output.push_str("## ✅ Applied Fixes\n\n");
            for (index, fix) in result.applied.iter().enumerate() {
                output.push_str(&format!("### {}. {}\n", index + 1, fix.description));
                output.push_str(&format!("**Issue Type**: {}\n", fix.kind));
                output.push_str(&format!("**Confidence**: {}%\n\n", fix.confidence));
                if !fix.original_snippet.is_empty() {
                    output.push_str(&format!(
                        "**Before**:\n```css\n{}\n```\n\n",
                        fix.original_snippet
                    ));
                }
                if !fix.fixed_snippet.is_empty() {
                    output.push_str(&format!(
                        "**After**:\n```css\n{}\n```\n\n",
                        fix.fixed_snippet
                    ));
                }
            }
        }

        if !result.skipped.is_empty() {
            output.push_str("## ⏭️ Skipped Fixes\n\n");
            for (index, skip) in result.skipped.iter().enumerate() {
                output.push_str(&format!(
                    "{}. **{}**: {}\n",
                    index + 1,
                    skip.kind,
                    skip.reason
                ));
            }
            output.push('\n');
        }

        output.push_str("## 📄 Complete Fixed CSS\n\n");
        output.push_str(&format!("```css\n{}\n```\n\n", result.fixed_source));

        output.push_str(&format!(
            "---\n*Auto-fix completed with undine v{}*",
            env!("CARGO_PKG_VERSION")
        ));
        output
    }
}

/// One markdown issue entry, numbered within its severity section
fn format_issue(issue: &Issue, index: usize) -> String {
    let mut output = format!("**{}. {}**\n", index, issue.message);

    if let Some(description) = &issue.description {
        output.push_str(&format!("   {}\n", description));
    }

    let mut place = Vec::new();
    if let Some(selector) = &issue.location.selector {
        place.push(format!("Selector: `{}`", selector));
    }
    if let Some(property) = &issue.location.property {
        place.push(format!("Property: `{}`", property));
    }
    if let Some(line) = issue.location.line {
        if line > 0 {
            place.push(format!("Line: {}", line));
        }
    }
    if !place.is_empty() {
        output.push_str(&format!("   📍 {}\n", place.join(", ")));
    }

    if let Some(fix) = &issue.fix {
        output.push_str(&format!("   🔧 **Fix**: {}\n", fix.description));
        if !fix.patch.trim().is_empty() {
            let indented = fix
                .patch
                .lines()
                .map(|line| format!("   {}", line))
                .collect::<Vec<_>>()
                .join("\n");
            output.push_str(&format!("   ```css\n{}\n   ```\n", indented));
        }
        if fix.confidence > 0 {
            output.push_str(&format!("   📊 Confidence: {}%\n", fix.confidence));
        }
    }

    if !issue.resources.is_empty() {
        output.push_str(&format!(
            "   📚 Documentation: {}\n",
            issue.resources.join(", ")
        ));
    }

    output.push('\n');
    output
}
