//! Stylesheet size and selector cost checks.
//!
//! The thresholds all come from [`AnalysisOptions`], so projects can
//! tighten or relax them in configuration.

use crate::config::AnalysisOptions;
use crate::models::{Fix, Issue, IssueKind, Severity, Stylesheet};

/// Run every performance check over the stylesheet
pub fn detect(stylesheet: &Stylesheet, options: &AnalysisOptions) -> Vec<Issue> {
    let mut issues = Vec::new();
    let thresholds = &options.thresholds;

    if stylesheet.source_bytes > thresholds.max_file_size {
        issues.push(
            Issue::new(
                IssueKind::PerformanceUnusedCss,
                Severity::Warning,
                format!(
                    "Stylesheet is {} KB, over the {} KB limit",
                    kilobytes(stylesheet.source_bytes),
                    kilobytes(thresholds.max_file_size)
                ),
            )
            .with_description("Large stylesheets slow down parsing and delay first paint")
            .with_fix(Fix::new(
                "Split the stylesheet and remove unused rules",
                "/* Split the stylesheet into smaller files and drop unused rules */",
                70,
            )),
        );
    }

    if stylesheet.rules.len() > thresholds.max_selectors {
        issues.push(
            Issue::new(
                IssueKind::PerformanceUnusedCss,
                Severity::Warning,
                format!(
                    "{} selectors exceed the configured limit of {}",
                    stylesheet.rules.len(),
                    thresholds.max_selectors
                ),
            )
            .with_description(
                "Selector-heavy stylesheets usually carry rules the markup no longer uses",
            )
            .with_fix(Fix::new(
                "Audit and remove unused selectors",
                "/* Audit the stylesheet for selectors nothing matches anymore */",
                65,
            )),
        );
    }

    for rule in &stylesheet.rules {
        let depth = nesting_level(&rule.selector);
        if depth > thresholds.max_nesting {
            issues.push(
                Issue::new(
                    IssueKind::PerformanceUnusedCss,
                    Severity::Warning,
                    format!("Selector '{}' is nested {} levels deep", rule.selector, depth),
                )
                .with_description(
                    "Browsers match selectors right to left, so long descendant chains are \
                     slow to match and brittle to maintain",
                )
                .with_selector(rule.selector.clone())
                .with_line(rule.line)
                .with_column(rule.column)
                .with_fix(Fix::new(
                    "Flatten the selector with a dedicated class",
                    format!(
                        "/* Replace '{}' with a dedicated class like '{}' */",
                        rule.selector,
                        flatter_selector(&rule.selector)
                    ),
                    75,
                )),
            );
        }
    }

    issues
}

/// Whole kilobytes, rounded to nearest
fn kilobytes(bytes: usize) -> usize {
    (bytes + 512) / 1024
}

/// Descendant depth, counted as whitespace-separated segments
fn nesting_level(selector: &str) -> usize {
    selector.split_whitespace().count()
}

/// Suggest a single class named after the chain's last segment
fn flatter_selector(selector: &str) -> String {
    let last = selector.split_whitespace().last().unwrap_or(selector);
    format!(".{}", last.replacen(['#', '.'], "", 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Thresholds;
    use crate::parser;

    fn analyze_with(css: &str, thresholds: Thresholds) -> Vec<Issue> {
        let sheet = parser::parse(css).expect("valid css");
        let options = AnalysisOptions {
            thresholds,
            ..AnalysisOptions::default()
        };
        detect(&sheet, &options)
    }

    #[test]
    fn small_sheets_are_clean() {
        let issues = analyze_with(".a { color: red; }", Thresholds::default());

        assert!(issues.is_empty());
    }

    #[test]
    fn oversized_sheet_warns() {
        let thresholds = Thresholds {
            max_file_size: 10,
            ..Thresholds::default()
        };
        let issues = analyze_with(".a { color: red; }", thresholds);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::PerformanceUnusedCss);
        assert_eq!(issues[0].severity, Severity::Warning);
        assert!(issues[0].message.contains("KB"));
    }

    #[test]
    fn selector_count_limit_is_exclusive() {
        let thresholds = Thresholds {
            max_selectors: 2,
            ..Thresholds::default()
        };
        let two = ".a { color: red; }\n.b { color: blue; }";
        let three = ".a { color: red; }\n.b { color: blue; }\n.c { color: green; }";

        assert!(analyze_with(two, thresholds.clone()).is_empty());

        let issues = analyze_with(three, thresholds);
        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("selectors"));
    }

    #[test]
    fn deep_nesting_warns_with_a_flatter_suggestion() {
        let issues = analyze_with(
            "html body div ul li a { color: red; }",
            Thresholds::default(),
        );

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("6 levels"));
        let fix = issues[0].fix.as_ref().unwrap();
        assert_eq!(fix.confidence, 75);
        assert!(fix.patch.contains(".a"));
    }

    #[test]
    fn nesting_at_the_limit_is_allowed() {
        let issues = analyze_with("html body div ul li { color: red; }", Thresholds::default());

        assert!(issues.is_empty());
    }

    #[test]
    fn chain_tail_becomes_a_class_name() {
        assert_eq!(flatter_selector("#page .content .item"), ".item");
        assert_eq!(flatter_selector("ul li a"), ".a");
        assert_eq!(flatter_selector("#solo"), ".solo");
    }
}
