//! Flexbox, grid and positioning checks.
//!
//! Works on one rule at a time: the declarations are folded into a
//! last-wins property map, then each container kind gets its own set of
//! structural checks.

use std::collections::HashMap;

use crate::config::AnalysisOptions;
use crate::models::{Declaration, Fix, Issue, IssueKind, Rule, Severity, Stylesheet};

const ALIGN_ITEMS_DOCS: &str = "https://developer.mozilla.org/en-US/docs/Web/CSS/align-items";
const GRID_TEMPLATE_DOCS: &str = "https://developer.mozilla.org/en-US/docs/Web/CSS/grid-template";

/// Run every layout check over the stylesheet
pub fn detect(stylesheet: &Stylesheet, _options: &AnalysisOptions) -> Vec<Issue> {
    let mut issues = Vec::new();

    for rule in &stylesheet.rules {
        let properties = rule.property_map();
        let display = properties
            .get("display")
            .map(|decl| decl.value.to_ascii_lowercase())
            .unwrap_or_default();

        if display == "flex" || display == "inline-flex" {
            check_flex_container(rule, &properties, &mut issues);
        }
        if display == "grid" || display == "inline-grid" {
            check_grid_container(rule, &properties, &mut issues);
        }
        check_grid_placement(rule, &properties, &mut issues);
        check_positioning(rule, &properties, &mut issues);
    }

    issues
}

fn check_flex_container(
    rule: &Rule,
    properties: &HashMap<String, &Declaration>,
    issues: &mut Vec<Issue>,
) {
    if properties.contains_key("align-items") && !has_explicit_height(properties) {
        issues.push(
            Issue::new(
                IssueKind::FlexboxAlignmentFailed,
                Severity::Warning,
                "align-items may have no effect: the flex container has no explicit height",
            )
            .with_description(
                "Without an explicit height the container collapses to its content, \
                 leaving no room for cross-axis alignment",
            )
            .with_selector(rule.selector.clone())
            .with_property("align-items")
            .with_line(rule.line)
            .with_column(rule.column)
            .with_fix(Fix::new(
                "Give the flex container an explicit height",
                format!(
                    "{} {{\n  min-height: 100vh; /* or another suitable height */\n}}",
                    rule.selector
                ),
                85,
            ))
            .with_resource(ALIGN_ITEMS_DOCS),
        );
    }

    let single_line = match properties.get("flex-wrap") {
        None => true,
        Some(decl) => decl.value.eq_ignore_ascii_case("nowrap"),
    };
    if properties.contains_key("align-content") && single_line {
        issues.push(
            Issue::new(
                IssueKind::FlexboxAlignmentFailed,
                Severity::Info,
                "align-content has no effect in a single-line flex container",
            )
            .with_description("align-content only applies once flex-wrap allows multiple lines")
            .with_selector(rule.selector.clone())
            .with_property("align-content")
            .with_line(rule.line)
            .with_column(rule.column)
            .with_fix(Fix::new(
                "Add flex-wrap: wrap to enable multi-line layout",
                format!("{} {{\n  flex-wrap: wrap;\n}}", rule.selector),
                90,
            )),
        );
    }

    if properties.contains_key("flex-grow") && !properties.contains_key("flex-basis") {
        issues.push(
            Issue::new(
                IssueKind::FlexboxAlignmentFailed,
                Severity::Hint,
                "flex-grow without an explicit flex-basis",
            )
            .with_description(
                "Declaring flex-basis alongside flex-grow avoids unpredictable initial sizing",
            )
            .with_selector(rule.selector.clone())
            .with_property("flex-grow")
            .with_line(rule.line)
            .with_column(rule.column)
            .with_fix(Fix::new(
                "Add a flex-basis declaration",
                format!("{} {{\n  flex-basis: 0; /* or auto */\n}}", rule.selector),
                75,
            )),
        );
    }
}

/// A container counts as explicitly sized when it declares a height, or
/// when it is a column flex container sized through flex-basis
fn has_explicit_height(properties: &HashMap<String, &Declaration>) -> bool {
    properties.contains_key("height")
        || properties.contains_key("min-height")
        || properties.contains_key("max-height")
        || (properties.contains_key("flex-basis")
            && properties
                .get("flex-direction")
                .is_some_and(|decl| decl.value.eq_ignore_ascii_case("column")))
}

fn check_grid_container(
    rule: &Rule,
    properties: &HashMap<String, &Declaration>,
    issues: &mut Vec<Issue>,
) {
    let has_template = properties.contains_key("grid-template-columns")
        || properties.contains_key("grid-template-rows")
        || properties.contains_key("grid-template-areas");

    if !has_template {
        issues.push(
            Issue::new(
                IssueKind::GridTemplateMissing,
                Severity::Error,
                "Grid container has no template definition",
            )
            .with_description(
                "A grid container needs grid-template-columns, grid-template-rows \
                 or grid-template-areas to lay out its tracks",
            )
            .with_selector(rule.selector.clone())
            .with_line(rule.line)
            .with_column(rule.column)
            .with_fix(Fix::new(
                "Add a grid template definition",
                format!(
                    "{} {{\n  grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));\n}}",
                    rule.selector
                ),
                80,
            ))
            .with_resource(GRID_TEMPLATE_DOCS),
        );
    }

    if properties.contains_key("grid-gap")
        || properties.contains_key("grid-row-gap")
        || properties.contains_key("grid-column-gap")
    {
        issues.push(
            Issue::new(
                IssueKind::GridTemplateMissing,
                Severity::Warning,
                "grid-gap is deprecated, use gap instead",
            )
            .with_description("The grid-gap family was standardized as gap, row-gap and column-gap")
            .with_selector(rule.selector.clone())
            .with_property("grid-gap")
            .with_line(rule.line)
            .with_column(rule.column)
            .with_fix(Fix::new(
                "Use the modern gap property",
                format!("{} {{\n  gap: 1rem; /* replaces grid-gap */\n}}", rule.selector),
                95,
            )),
        );
    }
}

fn check_grid_placement(
    rule: &Rule,
    properties: &HashMap<String, &Declaration>,
    issues: &mut Vec<Issue>,
) {
    // Named lines cannot be validated without the container's template
    for property in ["grid-column", "grid-row", "grid-area"] {
        let decl = match properties.get(property) {
            Some(decl) => decl,
            None => continue,
        };
        if decl.value.contains('[') && decl.value.contains(']') {
            issues.push(
                Issue::new(
                    IssueKind::GridTemplateMissing,
                    Severity::Hint,
                    "Verify the named grid line exists in the container's template",
                )
                .with_description(
                    "Named lines must be declared in the container's grid-template \
                     before items can reference them",
                )
                .with_selector(rule.selector.clone())
                .with_property(property)
                .with_line(rule.line)
                .with_column(rule.column),
            );
            return;
        }
    }
}

fn check_positioning(
    rule: &Rule,
    properties: &HashMap<String, &Declaration>,
    issues: &mut Vec<Issue>,
) {
    let positioned = properties
        .get("position")
        .is_some_and(|decl| !decl.value.eq_ignore_ascii_case("static"));

    let has_offsets = ["top", "right", "bottom", "left"]
        .iter()
        .any(|prop| properties.contains_key(*prop));

    if has_offsets && !positioned {
        issues.push(
            Issue::new(
                IssueKind::PositioningZIndex,
                Severity::Error,
                "Offset properties require a non-static position",
            )
            .with_description("top, right, bottom and left only apply to positioned elements")
            .with_selector(rule.selector.clone())
            .with_line(rule.line)
            .with_column(rule.column)
            .with_fix(Fix::new(
                "Set a suitable position value",
                format!(
                    "{} {{\n  position: relative; /* or absolute, fixed */\n}}",
                    rule.selector
                ),
                90,
            )),
        );
    }

    if properties.contains_key("z-index") && !positioned {
        issues.push(
            Issue::new(
                IssueKind::PositioningZIndex,
                Severity::Warning,
                "z-index has no effect on a static element",
            )
            .with_description(
                "z-index only applies to positioned elements (relative, absolute, fixed, sticky)",
            )
            .with_selector(rule.selector.clone())
            .with_property("z-index")
            .with_line(rule.line)
            .with_column(rule.column)
            .with_fix(Fix::new(
                "Position the element",
                format!("{} {{\n  position: relative;\n}}", rule.selector),
                85,
            )),
        );
    }
}
