//! Contrast, font size and focus visibility checks.
//!
//! Every check walks individual declarations, so a rule can collect
//! several findings at once.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::AnalysisOptions;
use crate::models::{Declaration, Fix, Issue, IssueKind, Rule, Severity, Stylesheet};

const CONTRAST_CHECKER: &str = "https://webaim.org/resources/contrastchecker/";

// Smallest comfortably readable pixel size
const MIN_FONT_PX: f64 = 12.0;

// Only exact literal spellings are recognized; computed or unusually
// spaced values are out of scope for a static check
const LIGHT_COLORS: [&str; 5] = ["white", "#fff", "#ffffff", "rgb(255,255,255)", "hsl(0,0%,100%)"];
const DARK_COLORS: [&str; 5] = ["black", "#000", "#000000", "rgb(0,0,0)", "hsl(0,0%,0%)"];

static PX_VALUE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)px").unwrap());

/// Run every accessibility check over the stylesheet
pub fn detect(stylesheet: &Stylesheet, _options: &AnalysisOptions) -> Vec<Issue> {
    let mut issues = Vec::new();

    for rule in &stylesheet.rules {
        for decl in &rule.declarations {
            check_contrast(rule, decl, &mut issues);
            check_font_size(rule, decl, &mut issues);
            check_focus_outline(rule, decl, &mut issues);
        }
    }

    issues
}

fn check_contrast(rule: &Rule, decl: &Declaration, issues: &mut Vec<Issue>) {
    let property = decl.property_lower();
    if property != "color" && property != "background-color" {
        return;
    }
    if !is_extreme_color(&decl.value) {
        return;
    }

    issues.push(
        Issue::new(
            IssueKind::AccessibilityContrast,
            Severity::Warning,
            "Possibly insufficient color contrast",
        )
        .with_description(
            "Make sure the text and background colors have enough contrast to stay readable",
        )
        .with_selector(rule.selector.clone())
        .with_property(property)
        .with_line(decl.line)
        .with_column(decl.column)
        .with_fix(Fix::new(
            "Verify and adjust the colors with a contrast checker",
            "/* Aim for a contrast ratio of at least 4.5:1 (WCAG AA) */",
            60,
        ))
        .with_resource(CONTRAST_CHECKER),
    );
}

/// Pure black or white in any of its common literal spellings
fn is_extreme_color(value: &str) -> bool {
    let value = value.to_ascii_lowercase();
    LIGHT_COLORS.contains(&value.as_str()) || DARK_COLORS.contains(&value.as_str())
}

fn check_font_size(rule: &Rule, decl: &Declaration, issues: &mut Vec<Issue>) {
    if decl.property_lower() != "font-size" {
        return;
    }
    let caps = match PX_VALUE.captures(&decl.value) {
        Some(caps) => caps,
        None => return,
    };
    let size: f64 = caps[1].parse().unwrap_or(f64::MAX);

    if size < MIN_FONT_PX {
        issues.push(
            Issue::new(
                IssueKind::AccessibilityContrast,
                Severity::Warning,
                format!("Font size {} is below the 12px readability floor", decl.value),
            )
            .with_description("Text this small is hard to read, especially on dense screens")
            .with_selector(rule.selector.clone())
            .with_property("font-size")
            .with_line(decl.line)
            .with_column(decl.column)
            .with_fix(Fix::new(
                "Use at least 14px or an equivalent relative size",
                format!("{} {{\n  font-size: 14px; /* or 0.875rem */\n}}", rule.selector),
                80,
            )),
        );
    }
}

fn check_focus_outline(rule: &Rule, decl: &Declaration, issues: &mut Vec<Issue>) {
    if !rule.selector.contains(":focus") {
        return;
    }
    if decl.property_lower() != "outline" || !decl.value.eq_ignore_ascii_case("none") {
        return;
    }

    issues.push(
        Issue::new(
            IssueKind::AccessibilityContrast,
            Severity::Error,
            "Removing the focus outline breaks keyboard navigation",
        )
        .with_description("Keep a visible indicator so keyboard users can tell what has focus")
        .with_selector(rule.selector.clone())
        .with_property("outline")
        .with_line(decl.line)
        .with_column(decl.column)
        .with_fix(Fix::new(
            "Provide an alternative focus indicator",
            format!(
                "{} {{\n  outline: 2px solid #005fcc;\n  outline-offset: 2px;\n}}",
                rule.selector
            ),
            90,
        )),
    );
}
