use serde::{Deserialize, Serialize};

use super::issue::{Issue, IssueKind, Severity};

/// Issue counts by severity.
///
/// Always an exact partition of the result's issue list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    /// Total number of issues
    pub total_issues: usize,

    /// Number of error-severity issues
    pub error_count: usize,

    /// Number of warning-severity issues
    pub warning_count: usize,

    /// Number of info-severity issues
    pub info_count: usize,

    /// Number of hint-severity issues
    pub hint_count: usize,
}

impl Summary {
    /// Count the given issues by severity
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut summary = Self {
            total_issues: issues.len(),
            ..Self::default()
        };

        for issue in issues {
            match issue.severity {
                Severity::Error => summary.error_count += 1,
                Severity::Warning => summary.warning_count += 1,
                Severity::Info => summary.info_count += 1,
                Severity::Hint => summary.hint_count += 1,
            }
        }

        summary
    }
}

/// Size and specificity measurements for the analyzed stylesheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    /// Source size in bytes
    pub file_size_bytes: usize,

    /// Number of rules (selector blocks)
    pub selectors_count: usize,

    /// Number of declarations across all rules
    pub properties_count: usize,

    /// Highest per-rule specificity total
    pub max_specificity: u32,

    /// Rounded mean of per-rule specificity totals (0 for no rules)
    pub avg_specificity: u32,
}

/// Improvement suggestions grouped by theme
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestions {
    /// Size and delivery optimizations
    pub optimizations: Vec<String>,

    /// Structural refactoring advice
    pub refactoring: Vec<String>,

    /// Modern-CSS adoption advice
    pub modernization: Vec<String>,
}

impl Suggestions {
    /// Whether no suggestions were produced
    pub fn is_empty(&self) -> bool {
        self.optimizations.is_empty()
            && self.refactoring.is_empty()
            && self.modernization.is_empty()
    }
}

/// The aggregated outcome of analyzing one stylesheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Issue counts by severity
    pub summary: Summary,

    /// All issues in detector order
    pub issues: Vec<Issue>,

    /// Stylesheet measurements
    pub metrics: Metrics,

    /// Improvement suggestions
    pub suggestions: Suggestions,
}

/// Audit record for one applied fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedFix {
    /// Id of the fixed issue
    pub issue_id: String,

    /// Kind of the fixed issue
    pub kind: IssueKind,

    /// What the fix did
    pub description: String,

    /// Confidence of the applied fix, 0-100
    pub confidence: u8,

    /// The selector's block before the edit
    pub original_snippet: String,

    /// The selector's block after the edit
    pub fixed_snippet: String,
}

/// Audit record for one skipped fix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedFix {
    /// Id of the skipped issue
    pub issue_id: String,

    /// Kind of the skipped issue
    pub kind: IssueKind,

    /// Why the fix was not applied
    pub reason: String,
}

/// The outcome of one fix-engine run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixResult {
    /// The source text the engine started from
    pub original_source: String,

    /// The source text after all applied edits
    pub fixed_source: String,

    /// Fixes that were applied, in application order
    pub applied: Vec<AppliedFix>,

    /// Fixes that were eligible but could not be applied
    pub skipped: Vec<SkippedFix>,

    /// Number of issues handed to the engine
    pub total_issues: usize,

    /// Number of applied fixes
    pub fixed_count: usize,

    /// Number of skipped fixes
    pub skipped_count: usize,
}
