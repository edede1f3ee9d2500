//! Issue detectors.
//!
//! Each family is a pure function from the rule model and options to a
//! list of issues: no retained state, no output read by another family.
//! That keeps them independently testable and lets the analyzer fan them
//! out across threads. [`DETECTORS`] fixes the execution (and report)
//! order.

pub mod accessibility;
pub mod compatibility;
pub mod layout;
pub mod maintainability;
pub mod performance;

use crate::config::AnalysisOptions;
use crate::models::{Issue, Stylesheet};

/// Signature every detector family implements
pub type DetectorFn = fn(&Stylesheet, &AnalysisOptions) -> Vec<Issue>;

/// Every detector family in fixed execution order
pub const DETECTORS: [(&str, DetectorFn); 5] = [
    ("layout", layout::detect as DetectorFn),
    ("maintainability", maintainability::detect as DetectorFn),
    ("performance", performance::detect as DetectorFn),
    ("accessibility", accessibility::detect as DetectorFn),
    ("compatibility", compatibility::detect as DetectorFn),
];

/// Whether the named family is enabled under the given options
pub fn enabled(name: &str, options: &AnalysisOptions) -> bool {
    match name {
        "layout" => options.checks.layout,
        "maintainability" => options.checks.maintainability,
        "performance" => options.checks.performance,
        "accessibility" => options.checks.accessibility,
        "compatibility" => options.checks.compatibility,
        _ => false,
    }
}
