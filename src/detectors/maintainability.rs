//! Specificity conflicts and selector maintainability checks.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::config::AnalysisOptions;
use crate::models::{Fix, Issue, IssueKind, Severity, Stylesheet};
use crate::specificity::{self, SpecificityScore};

const SPECIFICITY_DOCS: &str = "https://developer.mozilla.org/en-US/docs/Web/CSS/Specificity";

// Adjacent scores further apart than this invite !important escalation
const CONFLICT_GAP: u32 = 50;
// Scores above this are effectively impossible to override cleanly
const HIGH_SPECIFICITY: u32 = 300;
// Over-scoped selectors below this are usually intentional
const SUSPICIOUS_FLOOR: u32 = 100;

static ID_TOKEN: Lazy<Regex> = Lazy::new(|| Regex::new(r"#[\w-]+").unwrap());
static ELEMENT_WITH_CLASS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)\.([\w-]+)").unwrap());
static ELEMENT_WITH_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\w+)#([\w-]+)").unwrap());
static COMBINATOR_SPACING: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*>\s*").unwrap());

// Selector shapes that tend to outlive the markup they were written for
static SUSPICIOUS_SHAPES: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![
        Regex::new(r"body\s+\w+\s+\w+\s+\w+").unwrap(),
        Regex::new(r"#[\w-]+\s+#[\w-]+").unwrap(),
        Regex::new(r"\.[\w-]+\s+\.[\w-]+\s+\.[\w-]+\s+\.[\w-]+").unwrap(),
    ]
});

/// Run every maintainability check over the stylesheet
pub fn detect(stylesheet: &Stylesheet, _options: &AnalysisOptions) -> Vec<Issue> {
    let mut issues = Vec::new();
    check_property_conflicts(stylesheet, &mut issues);
    check_selector_complexity(stylesheet, &mut issues);
    check_probably_unused(stylesheet, &mut issues);
    issues
}

struct Contender<'a> {
    selector: &'a str,
    value: &'a str,
    score: SpecificityScore,
    line: usize,
    column: usize,
}

/// Group declarations by property and compare the selectors competing
/// for each one
fn check_property_conflicts(stylesheet: &Stylesheet, issues: &mut Vec<Issue>) {
    let mut by_property: BTreeMap<String, Vec<Contender>> = BTreeMap::new();

    for rule in &stylesheet.rules {
        for decl in &rule.declarations {
            by_property
                .entry(decl.property_lower())
                .or_default()
                .push(Contender {
                    selector: &rule.selector,
                    value: &decl.value,
                    score: specificity::calculate(&rule.selector),
                    line: rule.line,
                    column: rule.column,
                });
        }
    }

    for (property, mut contenders) in by_property {
        if contenders.len() < 2 {
            continue;
        }
        // Stable sort keeps source order between equal scores
        contenders.sort_by(|a, b| b.score.total.cmp(&a.score.total));

        for pair in contenders.windows(2) {
            let (stronger, weaker) = (&pair[0], &pair[1]);
            let gap = stronger.score.total - weaker.score.total;

            if gap > CONFLICT_GAP {
                issues.push(
                    Issue::new(
                        IssueKind::SpecificityConflict,
                        Severity::Warning,
                        "Large specificity gap may cause override problems",
                    )
                    .with_description(format!(
                        "'{}' ({}) is far more specific than '{}' ({})",
                        stronger.selector, stronger.score.total, weaker.selector, weaker.score.total
                    ))
                    .with_selector(stronger.selector.to_string())
                    .with_property(property.clone())
                    .with_line(stronger.line)
                    .with_column(stronger.column)
                    .with_fix(Fix::new(
                        "Reduce the stronger selector's complexity, or raise the weaker one's",
                        format!(
                            "/* Consider simplifying '{}' to '{}' */",
                            stronger.selector,
                            simplify_selector(stronger.selector)
                        ),
                        70,
                    ))
                    .with_resource(SPECIFICITY_DOCS),
                );
            } else if gap == 0 && stronger.value != weaker.value {
                issues.push(
                    Issue::new(
                        IssueKind::SpecificityConflict,
                        Severity::Info,
                        "Equally specific selectors depend on source order",
                    )
                    .with_description(format!(
                        "'{}' and '{}' share specificity {}; whichever comes later in the \
                         stylesheet wins",
                        stronger.selector, weaker.selector, stronger.score.total
                    ))
                    .with_selector(stronger.selector.to_string())
                    .with_property(property.clone())
                    .with_line(stronger.line)
                    .with_column(stronger.column)
                    .with_fix(Fix::new(
                        "Reorder the rules or adjust one selector's specificity",
                        "/* Keep the rule that should win later in the file, or raise \
                         its specificity */",
                        60,
                    )),
                );
            }
        }
    }
}

fn check_selector_complexity(stylesheet: &Stylesheet, issues: &mut Vec<Issue>) {
    for rule in &stylesheet.rules {
        let score = specificity::calculate(&rule.selector);

        if score.total > HIGH_SPECIFICITY {
            issues.push(
                Issue::new(
                    IssueKind::SpecificityConflict,
                    Severity::Warning,
                    format!("Selector specificity is too high ({})", score.total),
                )
                .with_description(
                    "High-specificity selectors are hard to maintain and hard to override",
                )
                .with_selector(rule.selector.clone())
                .with_line(rule.line)
                .with_column(rule.column)
                .with_fix(Fix::new(
                    "Simplify the selector with fewer ids and less nesting",
                    simplified_block(&rule.selector),
                    75,
                )),
            );
        }

        if score.ids > 1 {
            issues.push(
                Issue::new(
                    IssueKind::SpecificityConflict,
                    Severity::Error,
                    "Selector contains multiple id selectors",
                )
                .with_description(
                    "An element has a single id, so chained or repeated ids usually \
                     indicate a mistake",
                )
                .with_selector(rule.selector.clone())
                .with_line(rule.line)
                .with_column(rule.column)
                .with_fix(Fix::new(
                    "Remove the duplicate ids or use classes instead",
                    demote_extra_ids(&rule.selector),
                    85,
                )),
            );
        }
    }
}

fn check_probably_unused(stylesheet: &Stylesheet, issues: &mut Vec<Issue>) {
    for rule in &stylesheet.rules {
        let score = specificity::calculate(&rule.selector);
        if score.total <= SUSPICIOUS_FLOOR {
            continue;
        }
        if SUSPICIOUS_SHAPES.iter().any(|shape| shape.is_match(&rule.selector)) {
            issues.push(
                Issue::new(
                    IssueKind::SpecificityConflict,
                    Severity::Hint,
                    "Possibly unused high-specificity selector",
                )
                .with_description(
                    "The selector looks overly specific and may no longer match anything",
                )
                .with_selector(rule.selector.clone())
                .with_line(rule.line)
                .with_column(rule.column)
                .with_fix(Fix::new(
                    "Check whether the selector is still needed, or simplify it",
                    format!(
                        "/* Consider removing or simplifying this rule */\n/* {} {{ ... }} */",
                        rule.selector
                    ),
                    50,
                )),
            );
        }
    }
}

/// Drop redundant element prefixes and normalize child combinators
fn simplify_selector(selector: &str) -> String {
    let simplified = ELEMENT_WITH_CLASS.replace_all(selector, ".$2");
    let simplified = ELEMENT_WITH_ID.replace_all(&simplified, "#$2");
    let simplified = COMBINATOR_SPACING.replace_all(&simplified, " > ");
    simplified.trim().to_string()
}

/// Remove every id token after the first
fn strip_extra_ids(selector: &str) -> String {
    let mut kept_first = false;
    ID_TOKEN
        .replace_all(selector, |caps: &Captures| {
            if kept_first {
                String::new()
            } else {
                kept_first = true;
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Rewrite every id token after the first as a class token
fn demote_extra_ids(selector: &str) -> String {
    let mut kept_first = false;
    ID_TOKEN
        .replace_all(selector, |caps: &Captures| {
            if kept_first {
                format!(".{}", &caps[0][1..])
            } else {
                kept_first = true;
                caps[0].to_string()
            }
        })
        .into_owned()
}

/// Comment block suggesting a lighter version of the selector
fn simplified_block(selector: &str) -> String {
    let simplified = simplify_selector(&strip_extra_ids(selector));
    format!("/* Consider simplifying to: */\n{} {{\n  /* ... */\n}}", simplified)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser;

    fn analyze(css: &str) -> Vec<Issue> {
        let sheet = parser::parse(css).expect("valid css");
        detect(&sheet, &AnalysisOptions::default())
    }

    #[test]
    fn large_specificity_gap_warns() {
        let issues = analyze("#nav #menu a { color: red; }\na { color: blue; }");

        let gap: Vec<_> = issues
            .iter()
            .filter(|i| i.message.contains("specificity gap"))
            .collect();
        assert_eq!(gap.len(), 1);
        assert_eq!(gap[0].severity, Severity::Warning);
        assert_eq!(gap[0].location.property.as_deref(), Some("color"));
        assert_eq!(gap[0].location.selector.as_deref(), Some("#nav #menu a"));
    }

    #[test]
    fn close_scores_do_not_warn() {
        let issues = analyze(".a { color: red; }\n.b.c { color: blue; }");

        assert!(issues.iter().all(|i| !i.message.contains("specificity gap")));
    }

    #[test]
    fn equal_scores_with_different_values_are_info() {
        let issues = analyze(".a { color: red; }\n.b { color: blue; }");

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
        assert!(issues[0].message.contains("source order"));
    }

    #[test]
    fn equal_scores_with_equal_values_are_quiet() {
        let issues = analyze(".a { color: red; }\n.b { color: red; }");

        assert!(issues.is_empty());
    }

    #[test]
    fn repeated_selector_with_conflicting_values_is_flagged() {
        let issues = analyze(".a { color: red; }\n.a { color: blue; }");

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity, Severity::Info);
    }

    #[test]
    fn multiple_ids_are_an_error_with_a_demotion_fix() {
        let issues = analyze("#a#b { color: red; }");

        let errors: Vec<_> = issues.iter().filter(|i| i.severity == Severity::Error).collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, IssueKind::SpecificityConflict);
        assert_eq!(errors[0].fix.as_ref().unwrap().patch, "#a.b");
        assert_eq!(errors[0].fix.as_ref().unwrap().confidence, 85);
    }

    #[test]
    fn over_scoped_id_chain_fires_three_checks() {
        let issues = analyze("#page #content #main .text { color: red; }");

        assert_eq!(issues.len(), 3);
        assert!(issues.iter().any(|i| i.severity == Severity::Error));
        assert!(issues.iter().any(|i| i.severity == Severity::Warning));
        assert!(issues.iter().any(|i| i.severity == Severity::Hint));
    }

    #[test]
    fn long_class_chains_are_probably_unused() {
        let issues = analyze(".a .b .c .d .e .f .g .h .i .j .k { color: red; }");

        let hints: Vec<_> = issues.iter().filter(|i| i.severity == Severity::Hint).collect();
        assert_eq!(hints.len(), 1);
        assert!(hints[0].message.contains("unused"));
    }

    #[test]
    fn short_class_chains_are_left_alone() {
        let issues = analyze(".a .b .c .d { color: red; }");

        assert!(issues.iter().all(|i| i.severity != Severity::Hint));
    }

    #[test]
    fn demotes_every_id_after_the_first() {
        assert_eq!(demote_extra_ids("#a#b"), "#a.b");
        assert_eq!(demote_extra_ids("#nav #menu #item"), "#nav .menu .item");
        assert_eq!(demote_extra_ids("div#solo"), "div#solo");
    }

    #[test]
    fn strips_every_id_after_the_first() {
        assert_eq!(strip_extra_ids("#a#b"), "#a");
        assert_eq!(strip_extra_ids("#nav #menu .item"), "#nav  .item");
    }

    #[test]
    fn simplification_drops_redundant_element_prefixes() {
        assert_eq!(simplify_selector("div.card > p#intro"), ".card > #intro");
        assert_eq!(simplify_selector("ul   >   li"), "ul > li");
        assert_eq!(simplify_selector(".item"), ".item");
    }
}
