//! Browser support and vendor prefix checks.
//!
//! Modern-feature checks only run when the configuration names target
//! browsers; without declared targets there is nothing to judge support
//! against. The vendor prefix check is unconditional.

use crate::config::AnalysisOptions;
use crate::models::{Declaration, Fix, Issue, IssueKind, Rule, Severity, Stylesheet};

// Feature name and the oldest browser generation that supports it
const MODERN_FEATURES: [(&str, &str); 5] = [
    ("grid", "IE 10+"),
    ("flex", "IE 11+"),
    ("gap", "Chrome 84+"),
    ("aspect-ratio", "Chrome 88+"),
    ("clamp", "Chrome 79+"),
];

// Properties still shipped behind vendor prefixes somewhere
const PREFIX_FEATURES: [&str; 4] = ["appearance", "user-select", "backdrop-filter", "clip-path"];

/// Run every compatibility check over the stylesheet
pub fn detect(stylesheet: &Stylesheet, options: &AnalysisOptions) -> Vec<Issue> {
    let mut issues = Vec::new();
    let has_targets = options.browsers.is_some();

    for rule in &stylesheet.rules {
        for decl in &rule.declarations {
            if has_targets {
                check_modern_features(rule, decl, &mut issues);
            }
            check_vendor_prefixes(rule, decl, &mut issues);
        }
    }

    issues
}

fn check_modern_features(rule: &Rule, decl: &Declaration, issues: &mut Vec<Issue>) {
    let property = decl.property_lower();
    let value = decl.value.to_ascii_lowercase();

    for (feature, support) in MODERN_FEATURES {
        let used =
            property.contains(feature) || (property == "display" && value.contains(feature));
        if !used {
            continue;
        }

        issues.push(
            Issue::new(
                IssueKind::CompatibilityUnsupported,
                Severity::Info,
                format!("'{}' has limited browser support", feature),
            )
            .with_description(format!("'{}' requires {} or newer", feature, support))
            .with_selector(rule.selector.clone())
            .with_property(decl.property.clone())
            .with_line(decl.line)
            .with_column(decl.column)
            .with_fix(Fix::new(
                "Add a fallback or run autoprefixer",
                fallback_patch(&property, &decl.value),
                70,
            )),
        );
    }
}

/// Progressive-enhancement snippet for the feature, when one is known
fn fallback_patch(property: &str, value: &str) -> String {
    if property == "display" && value.eq_ignore_ascii_case("grid") {
        "/* Flexbox fallback */\ndisplay: flex;\nflex-wrap: wrap;\n\
         /* Grid for browsers that support it */\ndisplay: grid;"
            .to_string()
    } else {
        format!("/* Add an appropriate fallback for '{}' */", property)
    }
}

fn check_vendor_prefixes(rule: &Rule, decl: &Declaration, issues: &mut Vec<Issue>) {
    let property = decl.property_lower();
    let value = decl.value.to_ascii_lowercase();

    let needs_prefix = PREFIX_FEATURES
        .iter()
        .any(|feature| property.contains(feature) || value.contains(feature));
    if !needs_prefix {
        return;
    }

    issues.push(
        Issue::new(
            IssueKind::CompatibilityUnsupported,
            Severity::Hint,
            "Vendor prefixes may be required",
        )
        .with_description(format!(
            "'{}' still needs vendor prefixes in some browsers",
            decl.property
        ))
        .with_selector(rule.selector.clone())
        .with_property(decl.property.clone())
        .with_line(decl.line)
        .with_column(decl.column)
        .with_fix(Fix::new(
            "Let autoprefixer generate the prefixes",
            "/* Generate vendor prefixes with autoprefixer */",
            85,
        )),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn analyze(css: &str, options: &AnalysisOptions) -> Vec<Issue> {
        let sheet = parser::parse(css).expect("valid css");
        detect(&sheet, options)
    }

    fn with_targets() -> AnalysisOptions {
        AnalysisOptions {
            browsers: Some(vec!["chrome 90".to_string(), "ie 11".to_string()]),
            ..AnalysisOptions::default()
        }
    }

    #[test]
    fn modern_features_are_silent_without_targets() {
        let issues = analyze(".g { display: grid; }", &AnalysisOptions::default());

        assert!(issues.is_empty());
    }

    #[test]
    fn grid_reports_when_targets_are_declared() {
        let issues = analyze(".g { display: grid; }", &with_targets());

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].kind, IssueKind::CompatibilityUnsupported);
        assert_eq!(issues[0].severity, Severity::Info);
        assert!(issues[0].message.contains("grid"));
        let fix = issues[0].fix.as_ref().unwrap();
        assert_eq!(fix.confidence, 70);
        assert!(fix.patch.contains("display: flex;"));
    }

    #[test]
    fn feature_names_match_inside_property_names() {
        let issues = analyze(".g { grid-template-columns: 1fr; }", &with_targets());

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("grid"));
    }

    #[test]
    fn grid_gap_matches_two_features() {
        let issues = analyze(".g { grid-gap: 10px; }", &with_targets());

        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.message.contains("'grid'")));
        assert!(issues.iter().any(|i| i.message.contains("'gap'")));
    }

    #[test]
    fn clamp_in_a_value_is_out_of_scope() {
        let issues = analyze(".a { width: clamp(1rem, 2vw, 3rem); }", &with_targets());

        assert!(issues.is_empty());
    }

    #[test]
    fn vendor_prefix_hint_fires_without_targets() {
        let issues = analyze(".a { user-select: none; }", &AnalysisOptions::default());

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Hint);
        assert_eq!(issues[0].fix.as_ref().unwrap().confidence, 85);
    }

    #[test]
    fn prefixed_spelling_still_hints() {
        let issues = analyze(".a { -webkit-appearance: none; }", &AnalysisOptions::default());

        assert_eq!(issues.len(), 1);
        assert_eq!(
            issues[0].location.property.as_deref(),
            Some("-webkit-appearance")
        );
    }

    #[test]
    fn feature_mentions_in_values_hint_too() {
        let issues = analyze(
            ".a { transition: backdrop-filter 0.3s ease; }",
            &AnalysisOptions::default(),
        );

        assert_eq!(issues.len(), 1);
    }
}
