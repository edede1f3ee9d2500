//! Confidence-gated rewriting of analyzed stylesheets.

use log::debug;
use regex::Regex;

use crate::models::{AppliedFix, FixResult, Issue, IssueKind, SkippedFix};

/// Tuning for [`apply_fixes`].
#[derive(Debug, Clone)]
pub struct FixOptions {
    /// Minimum fix confidence, 0-100.
    pub confidence_threshold: u8,
    /// Restrict rewriting to these kinds; `None` rewrites every kind.
    pub kinds: Option<Vec<IssueKind>>,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            confidence_threshold: 70,
            kinds: None,
        }
    }
}

/// Outcome of one fix attempt against the current buffer.
enum Attempt {
    Applied(String),
    Skipped(String),
}

/// Rewrites `source` by applying every eligible fix in issue order.
///
/// Each strategy searches the current buffer, so later fixes observe the text
/// produced by earlier ones. The untouched `source` stays available for the
/// before snippets in the audit trail.
pub fn apply_fixes(source: &str, issues: &[Issue], options: &FixOptions) -> FixResult {
    let chosen: Vec<&Issue> = issues
        .iter()
        .filter(|issue| selected(issue, options))
        .collect();
    let total_issues = chosen.len();
    debug!(
        "applying {} of {} fixes at confidence >= {}",
        total_issues,
        issues.len(),
        options.confidence_threshold
    );

    let mut buffer = source.to_string();
    let mut applied = Vec::new();
    let mut skipped = Vec::new();
    for issue in chosen {
        match attempt(&buffer, issue) {
            Attempt::Applied(updated) => {
                let (description, confidence) = issue
                    .fix
                    .as_ref()
                    .map(|fix| (fix.description.clone(), fix.confidence))
                    .unwrap_or_default();
                applied.push(AppliedFix {
                    issue_id: issue.id.clone(),
                    kind: issue.kind,
                    description,
                    confidence,
                    original_snippet: snippet(source, issue),
                    fixed_snippet: snippet(&updated, issue),
                });
                buffer = updated;
            }
            Attempt::Skipped(reason) => {
                debug!("skipped {} fix: {}", issue.kind, reason);
                skipped.push(SkippedFix {
                    issue_id: issue.id.clone(),
                    kind: issue.kind,
                    reason,
                });
            }
        }
    }

    let fixed_count = applied.len();
    let skipped_count = skipped.len();
    FixResult {
        original_source: source.to_string(),
        fixed_source: buffer,
        applied,
        skipped,
        total_issues,
        fixed_count,
        skipped_count,
    }
}

/// An issue qualifies when it carries a fix at or above the threshold and
/// survives the kind filter. An empty filter list means no filter.
fn selected(issue: &Issue, options: &FixOptions) -> bool {
    let confident = issue
        .fix
        .as_ref()
        .map_or(false, |fix| fix.confidence >= options.confidence_threshold);
    if !confident {
        return false;
    }
    match &options.kinds {
        Some(kinds) if !kinds.is_empty() => kinds.contains(&issue.kind),
        _ => true,
    }
}

fn attempt(css: &str, issue: &Issue) -> Attempt {
    match issue.kind {
        IssueKind::FlexboxAlignmentFailed => fix_flexbox(css, issue),
        IssueKind::GridTemplateMissing => fix_grid(css, issue),
        IssueKind::PositioningZIndex => fix_positioning(css, issue),
        IssueKind::AccessibilityContrast => fix_accessibility(css, issue),
        IssueKind::SpecificityConflict => fix_specificity(css, issue),
        IssueKind::CompatibilityUnsupported => fix_compatibility(css, issue),
        _ => generic_fix(css, issue),
    }
}

fn fix_flexbox(css: &str, issue: &Issue) -> Attempt {
    let selector = match issue.location.selector.as_deref() {
        Some(selector) => selector,
        None => return Attempt::Skipped("No selector recorded for the flexbox fix".to_string()),
    };
    match issue.location.property.as_deref() {
        // Adding a second height declaration would fight the existing one.
        Some("align-items") => {
            if let Some(updated) =
                append_declaration(css, selector, "min-height: 100vh;", Some("height"))
            {
                return Attempt::Applied(updated);
            }
        }
        Some("align-content") => {
            if let Some(updated) = append_declaration(css, selector, "flex-wrap: wrap;", None) {
                return Attempt::Applied(updated);
            }
        }
        _ => {}
    }
    generic_fix(css, issue)
}

fn fix_grid(css: &str, issue: &Issue) -> Attempt {
    let selector = match issue.location.selector.as_deref() {
        Some(selector) => selector,
        None => return Attempt::Skipped("No selector recorded for the grid fix".to_string()),
    };
    match issue.location.property.as_deref() {
        None => {
            if let Some(updated) = append_declaration(
                css,
                selector,
                "grid-template-columns: repeat(auto-fit, minmax(200px, 1fr));",
                None,
            ) {
                return Attempt::Applied(updated);
            }
        }
        // The rename is safe everywhere, so it is not scoped to one rule.
        Some("grid-gap") => {
            let updated = css.replace("grid-gap:", "gap:");
            if updated != css {
                return Attempt::Applied(updated);
            }
        }
        _ => {}
    }
    generic_fix(css, issue)
}

fn fix_positioning(css: &str, issue: &Issue) -> Attempt {
    let selector = match issue.location.selector.as_deref() {
        Some(selector) => selector,
        None => {
            return Attempt::Skipped("No selector recorded for the positioning fix".to_string())
        }
    };
    if issue.location.property.is_none() {
        if let Some(updated) =
            append_declaration(css, selector, "position: relative;", Some("position:"))
        {
            return Attempt::Applied(updated);
        }
    }
    generic_fix(css, issue)
}

fn fix_accessibility(css: &str, issue: &Issue) -> Attempt {
    let (selector, property) = match (
        issue.location.selector.as_deref(),
        issue.location.property.as_deref(),
    ) {
        (Some(selector), Some(property)) => (selector, property),
        _ => {
            return Attempt::Skipped(
                "Accessibility fixes need both a selector and a property".to_string(),
            )
        }
    };
    if property == "outline" {
        if let Some(updated) = restore_focus_outline(css, selector) {
            return Attempt::Applied(updated);
        }
    }
    generic_fix(css, issue)
}

fn fix_specificity(css: &str, issue: &Issue) -> Attempt {
    // Simplification advice describes a refactor, not a textual edit.
    if patch_of(issue).contains("/*") {
        return Attempt::Skipped("Specificity issues require manual refactoring".to_string());
    }
    generic_fix(css, issue)
}

fn fix_compatibility(css: &str, issue: &Issue) -> Attempt {
    if patch_of(issue).contains("/*") {
        return Attempt::Skipped("Compatibility issues require a manual fallback".to_string());
    }
    generic_fix(css, issue)
}

/// Last resort: append the patch verbatim at the end of the sheet. Patches
/// that are commentary rather than runnable declarations are refused.
fn generic_fix(css: &str, issue: &Issue) -> Attempt {
    let patch = patch_of(issue);
    if patch.is_empty() || patch.contains("/*") {
        return Attempt::Skipped("No actionable fix code available".to_string());
    }
    Attempt::Applied(format!("{}\n\n/* Auto-generated fix */\n{}", css, patch))
}

fn patch_of(issue: &Issue) -> &str {
    issue.fix.as_ref().map_or("", |fix| fix.patch.as_str())
}

/// Appends a declaration before the closing brace of the first block whose
/// selector text matches, unless `guard` already appears in the block body.
fn append_declaration(
    css: &str,
    selector: &str,
    declaration: &str,
    guard: Option<&str>,
) -> Option<String> {
    let pattern = format!(r"({}\s*\{{[^}}]*)(\}})", regex::escape(selector));
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(css)?;
    let body = &caps[1];
    if let Some(marker) = guard {
        if body.contains(marker) {
            return None;
        }
    }
    let replacement = format!("{}\n  {}{}", body.trim(), declaration, &caps[2]);
    Some(splice(css, caps.get(0)?.range(), &replacement))
}

/// Swaps the first `outline: none` inside the matching block for a visible
/// outline plus an offset.
fn restore_focus_outline(css: &str, selector: &str) -> Option<String> {
    let pattern = format!(
        r"({}\s*\{{[^}}]*)outline\s*:\s*none\s*;?([^}}]*\}})",
        regex::escape(selector)
    );
    let re = Regex::new(&pattern).ok()?;
    let caps = re.captures(css)?;
    let replacement = format!(
        "{}outline: 2px solid #005fcc;\n  outline-offset: 2px;{}",
        &caps[1], &caps[2]
    );
    Some(splice(css, caps.get(0)?.range(), &replacement))
}

// Manual splice instead of Regex::replace so `$` in the surrounding CSS is
// never treated as a capture reference.
fn splice(css: &str, range: std::ops::Range<usize>, replacement: &str) -> String {
    let mut updated = String::with_capacity(css.len() + replacement.len());
    updated.push_str(&css[..range.start]);
    updated.push_str(replacement);
    updated.push_str(&css[range.end..]);
    updated
}

/// Pulls the first block matching the issue's selector out of `css` for the
/// audit trail. Returns an empty string when nothing matches.
fn snippet(css: &str, issue: &Issue) -> String {
    let selector = match issue.location.selector.as_deref() {
        Some(selector) => selector,
        None => return String::new(),
    };
    let pattern = format!(r"{}\s*\{{[^}}]*\}}", regex::escape(selector));
    match Regex::new(&pattern) {
        Ok(re) => re
            .find(css)
            .map_or_else(String::new, |found| found.as_str().to_string()),
        Err(_) => String::new(),
    }
}
