//! Analysis orchestration.
//!
//! Parses the stylesheet, fans the enabled detector families out in
//! parallel, then folds their findings into one [`AnalysisResult`]
//! with summary counts, metrics and suggestions.

use std::panic::{self, AssertUnwindSafe};

use log::{debug, error};
use rayon::prelude::*;

use crate::config::{AnalysisOptions, ScopeFilter};
use crate::detectors::{self, DetectorFn};
use crate::errors::UndineError;
use crate::models::{
    AnalysisResult, Issue, IssueKind, Metrics, Rule, Severity, Stylesheet, Suggestions, Summary,
};
use crate::parser;
use crate::specificity;

/// Stylesheet analyzer bound to one immutable set of options
pub struct CssAnalyzer {
    options: AnalysisOptions,
}

impl CssAnalyzer {
    /// Create an analyzer with the given options
    pub fn new(options: AnalysisOptions) -> Self {
        Self { options }
    }

    /// Analyze a stylesheet and aggregate everything into one report.
    ///
    /// Fails only on empty input; syntax errors are reported as issues
    /// so a partially broken sheet still produces a usable report.
    pub fn analyze(&self, source: &str, file: Option<&str>) -> Result<AnalysisResult, UndineError> {
        if source.trim().is_empty() {
            return Err(UndineError::EmptyInput);
        }

        let (stylesheet, syntax_errors) = parser::parse_lenient(source);

        if !syntax_errors.is_empty() {
            debug!(
                "short-circuiting analysis: {} syntax errors",
                syntax_errors.len()
            );
            let mut issues: Vec<Issue> = syntax_errors
                .iter()
                .map(|err| {
                    Issue::new(IssueKind::SyntaxError, Severity::Error, err.message.clone())
                        .with_line(err.line)
                        .with_column(err.column)
                })
                .collect();
            attach_file(&mut issues, file);

            return Ok(AnalysisResult {
                summary: Summary::from_issues(&issues),
                issues,
                metrics: compute_metrics(source, &stylesheet),
                suggestions: Suggestions::default(),
            });
        }

        let scoped;
        let subject = match &self.options.scope {
            Some(scope) => {
                scoped = apply_scope(&stylesheet, scope);
                &scoped
            }
            None => &stylesheet,
        };

        let active: Vec<(&str, DetectorFn)> = detectors::DETECTORS
            .iter()
            .copied()
            .filter(|(name, _)| detectors::enabled(name, &self.options))
            .collect();

        let batches: Vec<Vec<Issue>> = active
            .into_par_iter()
            .map(|(name, detect)| run_detector(name, detect, subject, &self.options))
            .collect();

        let mut issues: Vec<Issue> = batches.into_iter().flatten().collect();
        attach_file(&mut issues, file);

        let metrics = compute_metrics(source, &stylesheet);
        let suggestions = derive_suggestions(&issues, &metrics);
        debug!("analysis produced {} issues", issues.len());

        Ok(AnalysisResult {
            summary: Summary::from_issues(&issues),
            issues,
            metrics,
            suggestions,
        })
    }
}

impl Default for CssAnalyzer {
    fn default() -> Self {
        Self::new(AnalysisOptions::default())
    }
}

/// One-shot analysis with default options
pub fn analyze_css(source: &str) -> Result<AnalysisResult, UndineError> {
    CssAnalyzer::default().analyze(source, None)
}

/// Run one detector family, converting a panic into a synthetic issue
/// so a single bad check cannot sink the whole report
fn run_detector(
    name: &str,
    detect: DetectorFn,
    stylesheet: &Stylesheet,
    options: &AnalysisOptions,
) -> Vec<Issue> {
    match panic::catch_unwind(AssertUnwindSafe(|| detect(stylesheet, options))) {
        Ok(issues) => issues,
        Err(_) => {
            error!("{} detector panicked, its findings were dropped", name);
            vec![Issue::new(
                IssueKind::InternalError,
                Severity::Error,
                format!("The {} checks failed and were skipped", name),
            )]
        }
    }
}

/// Reduce the model to the rules and declarations the scope admits
fn apply_scope(stylesheet: &Stylesheet, scope: &ScopeFilter) -> Stylesheet {
    let rules = stylesheet
        .rules
        .iter()
        .filter(|rule| scope.matches_selector(&rule.selector))
        .map(|rule| Rule {
            selector: rule.selector.clone(),
            declarations: rule
                .declarations
                .iter()
                .filter(|decl| scope.matches_property(&decl.property))
                .cloned()
                .collect(),
            line: rule.line,
            column: rule.column,
            at_context: rule.at_context.clone(),
        })
        .collect();

    Stylesheet {
        rules,
        source_bytes: stylesheet.source_bytes,
    }
}

fn attach_file(issues: &mut [Issue], file: Option<&str>) {
    let name = match file {
        Some(name) => name,
        None => return,
    };
    for issue in issues {
        if issue.location.file.is_none() {
            issue.location.file = Some(name.to_string());
        }
    }
}

fn compute_metrics(source: &str, stylesheet: &Stylesheet) -> Metrics {
    let mut max_specificity = 0;
    let mut total_specificity: u64 = 0;

    for rule in &stylesheet.rules {
        let score = specificity::calculate(&rule.selector).total;
        max_specificity = max_specificity.max(score);
        total_specificity += u64::from(score);
    }

    let avg_specificity = if stylesheet.rules.is_empty() {
        0
    } else {
        (total_specificity as f64 / stylesheet.rules.len() as f64).round() as u32
    };

    Metrics {
        file_size_bytes: source.len(),
        selectors_count: stylesheet.rules.len(),
        properties_count: stylesheet.declaration_count(),
        max_specificity,
        avg_specificity,
    }
}

fn derive_suggestions(issues: &[Issue], metrics: &Metrics) -> Suggestions {
    let mut suggestions = Suggestions::default();

    if issues.iter().any(|i| i.kind == IssueKind::PerformanceUnusedCss) {
        suggestions
            .optimizations
            .push("Remove unused CSS rules with a coverage tool".to_string());
        suggestions
            .optimizations
            .push("Split the stylesheet and load parts on demand".to_string());
    }

    if issues.iter().any(|i| i.kind == IssueKind::SpecificityConflict) {
        suggestions
            .refactoring
            .push("Refactor high-specificity selectors".to_string());
        suggestions
            .refactoring
            .push("Adopt a naming methodology like BEM".to_string());
    }

    if issues.iter().any(|i| i.kind == IssueKind::CompatibilityUnsupported) {
        suggestions
            .modernization
            .push("Add progressive-enhancement fallbacks for modern features".to_string());
        suggestions
            .modernization
            .push("Run the stylesheet through PostCSS with autoprefixer".to_string());
    }

    if metrics.avg_specificity > 50 {
        suggestions
            .refactoring
            .push("Lower the average selector specificity".to_string());
    }

    if metrics.file_size_bytes > 100_000 {
        suggestions
            .optimizations
            .push("Minify and compress the stylesheet".to_string());
    }

    suggestions
}
