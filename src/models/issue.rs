use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Process-wide issue id sequence.
///
/// Monotonic so that ids stay unique even when many issues are emitted
/// within the same instant; ids are not meant to be stable across runs.
static NEXT_ISSUE_ID: AtomicU64 = AtomicU64::new(1);

/// Severity levels for issues
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - must be fixed
    Error,

    /// Warning - should be fixed
    Warning,

    /// Information - might be worth looking at
    Info,

    /// Hint - minor suggestion
    Hint,
}

/// Categories of issues the detectors can emit
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    /// Flex container alignment that cannot take effect
    FlexboxAlignmentFailed,

    /// Grid container without an explicit track template
    GridTemplateMissing,

    /// Selector specificity conflicts and hazards
    SpecificityConflict,

    /// Reserved for inheritance analysis
    InheritanceIssue,

    /// Reserved for breakpoint conflict analysis
    ResponsiveBreakpointConflict,

    /// Oversized or likely-unused CSS
    PerformanceUnusedCss,

    /// Feature not supported by the targeted browsers
    CompatibilityUnsupported,

    /// Insufficient color contrast or other accessibility hazards
    AccessibilityContrast,

    /// Content overflow hazards
    LayoutOverflow,

    /// Offset or z-index on an unpositioned element
    PositioningZIndex,

    /// The stylesheet could not be parsed
    SyntaxError,

    /// A detector failed while analyzing
    InternalError,
}

/// Where an issue was found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueLocation {
    /// File the stylesheet came from, when known
    pub file: Option<String>,

    /// Selector of the offending rule
    pub selector: Option<String>,

    /// Property the issue is about
    pub property: Option<String>,

    /// Line number (1-based)
    pub line: Option<usize>,

    /// Column number (1-based)
    pub column: Option<usize>,
}

/// A proposed source edit attached to an issue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fix {
    /// What applying the fix will do
    pub description: String,

    /// Replacement or insertion text; comment-only patches are
    /// suggestions the fix engine will refuse to apply
    pub patch: String,

    /// How confident the detector is that the fix is safe, 0-100
    pub confidence: u8,
}

impl Fix {
    /// Create a fix with the given confidence
    pub fn new(description: impl Into<String>, patch: impl Into<String>, confidence: u8) -> Self {
        Self {
            description: description.into(),
            patch: patch.into(),
            confidence,
        }
    }
}

/// A single finding produced by a detector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Unique id for this emission (`<kind>-<sequence>`)
    pub id: String,

    /// Category of the issue
    pub kind: IssueKind,

    /// Severity of the issue
    pub severity: Severity,

    /// Short human-readable message
    pub message: String,

    /// Longer explanation, when one helps
    pub description: Option<String>,

    /// Where the issue was found
    pub location: IssueLocation,

    /// Proposed fix, when one exists
    pub fix: Option<Fix>,

    /// Documentation links
    pub resources: Vec<String>,
}

impl Issue {
    /// Create an issue with a freshly assigned id
    pub fn new(kind: IssueKind, severity: Severity, message: impl Into<String>) -> Self {
        let seq = NEXT_ISSUE_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id: format!("{}-{}", kind, seq),
            kind,
            severity,
            message: message.into(),
            description: None,
            location: IssueLocation::default(),
            fix: None,
            resources: Vec::new(),
        }
    }

    /// Attach a longer explanation
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Record the file the stylesheet came from
    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.location.file = Some(file.into());
        self
    }

    /// Record the offending selector
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.location.selector = Some(selector.into());
        self
    }

    /// Record the property the issue is about
    pub fn with_property(mut self, property: impl Into<String>) -> Self {
        self.location.property = Some(property.into());
        self
    }

    /// Record the source line (1-based)
    pub fn with_line(mut self, line: usize) -> Self {
        self.location.line = Some(line);
        self
    }

    /// Record the source column (1-based)
    pub fn with_column(mut self, column: usize) -> Self {
        self.location.column = Some(column);
        self
    }

    /// Attach a proposed fix
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// Attach a documentation link
    pub fn with_resource(mut self, url: impl Into<String>) -> Self {
        self.resources.push(url.into());
        self
    }
}
