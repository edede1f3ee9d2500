//! Core data models for Undine

pub mod issue;
pub mod report;
pub mod stylesheet;

pub use issue::{Fix, Issue, IssueKind, IssueLocation, Severity};
pub use report::{
    AnalysisResult, AppliedFix, FixResult, Metrics, SkippedFix, Summary, Suggestions,
};
pub use stylesheet::{Declaration, Rule, Stylesheet};
