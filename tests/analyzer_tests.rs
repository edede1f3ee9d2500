use std::collections::HashSet;
use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;

use undine::analyzer::{analyze_css, CssAnalyzer};
use undine::cli::{AnalyzeArgs, Verbosity};
use undine::commands::AnalyzeCommand;
use undine::config::{AnalysisOptions, CheckToggles, ScopeFilter, Thresholds, UndineConfig};
use undine::errors::UndineError;
use undine::models::{IssueKind, Severity};
use undine::output::{formatter_for, MarkdownFormatter, OutputFormatter, PrettyFormatter};

#[test]
fn test_clean_stylesheet_has_no_issues() {
    let result = analyze_css(".card { color: #333; padding: 1rem; }").expect("analysis succeeds");

    assert!(result.issues.is_empty());
    assert_eq!(result.summary.total_issues, 0);
    assert_eq!(result.metrics.selectors_count, 1);
    assert_eq!(result.metrics.properties_count, 2);
    assert!(result.suggestions.is_empty());
}

#[test]
fn test_empty_input_is_rejected() {
    assert!(matches!(analyze_css(""), Err(UndineError::EmptyInput)));
    assert!(matches!(analyze_css("   \n\t  "), Err(UndineError::EmptyInput)));
}

#[test]
fn test_summary_is_a_partition_of_the_issue_list() {
    let css = ".f { display: flex; align-items: center; }\n\
               .g { display: grid; }\n\
               a:focus { outline: none; }\n\
               .tiny { font-size: 9px; }";
    let result = analyze_css(css).expect("analysis succeeds");

    let summary = result.summary;
    assert!(summary.total_issues > 0);
    assert_eq!(summary.total_issues, result.issues.len());
    assert_eq!(
        summary.error_count + summary.warning_count + summary.info_count + summary.hint_count,
        summary.total_issues
    );
}

#[test]
fn test_flexbox_alignment_warning_fires_and_clears() {
    let broken = analyze_css(".f { display: flex; align-items: center; }").unwrap();
    assert!(broken
        .issues
        .iter()
        .any(|i| i.kind == IssueKind::FlexboxAlignmentFailed && i.severity == Severity::Warning));

    let sized = analyze_css(".f { display: flex; align-items: center; min-height: 100vh; }").unwrap();
    assert!(sized
        .issues
        .iter()
        .all(|i| i.kind != IssueKind::FlexboxAlignmentFailed));
}

#[test]
fn test_bare_grid_container_is_an_error() {
    let result = analyze_css(".g { display: grid; }").unwrap();

    let grid: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.kind == IssueKind::GridTemplateMissing)
        .collect();
    assert_eq!(grid.len(), 1);
    assert_eq!(grid[0].severity, Severity::Error);
    assert_eq!(grid[0].location.selector.as_deref(), Some(".g"));
    assert!(grid[0].fix.is_some());
}

#[test]
fn test_multiple_ids_raise_a_specificity_error() {
    let result = analyze_css("#a#b { color: red; }").unwrap();

    assert!(result
        .issues
        .iter()
        .any(|i| i.kind == IssueKind::SpecificityConflict && i.severity == Severity::Error));
    assert_eq!(result.metrics.max_specificity, 200);
}

#[test]
fn test_syntax_errors_short_circuit_detection() {
    let css = ".a { color red; }\n.f { display: flex; align-items: center; }";
    let result = analyze_css(css).unwrap();

    assert!(!result.issues.is_empty());
    assert!(result.issues.iter().all(|i| i.kind == IssueKind::SyntaxError));
    assert!(result.issues.iter().all(|i| i.severity == Severity::Error));
    // The flexbox warning must not appear alongside syntax errors
    assert!(result
        .issues
        .iter()
        .all(|i| i.kind != IssueKind::FlexboxAlignmentFailed));
}

#[test]
fn test_issue_ids_are_unique() {
    let css = ".f { display: flex; align-items: center; }\n\
               .g { display: grid; }\n\
               .x { top: 0; z-index: 2; }";
    let result = analyze_css(css).unwrap();

    let ids: HashSet<&str> = result.issues.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids.len(), result.issues.len());
}

#[test]
fn test_issues_carry_the_file_name() {
    let analyzer = CssAnalyzer::default();
    let result = analyzer
        .analyze(".x { top: 0; }", Some("assets/site.css"))
        .unwrap();

    assert!(!result.issues.is_empty());
    for issue in &result.issues {
        assert_eq!(issue.location.file.as_deref(), Some("assets/site.css"));
    }
}

#[test]
fn test_disabled_families_do_not_report() {
    let options = AnalysisOptions {
        checks: CheckToggles {
            layout: false,
            accessibility: false,
            ..CheckToggles::default()
        },
        ..AnalysisOptions::default()
    };
    let analyzer = CssAnalyzer::new(options);

    let css = ".g { display: grid; }\na:focus { outline: none; }";
    let result = analyzer.analyze(css, None).unwrap();

    assert!(result.issues.iter().all(|i| {
        i.kind != IssueKind::GridTemplateMissing && i.kind != IssueKind::AccessibilityContrast
    }));
}

#[test]
fn test_selector_limit_is_exclusive() {
    let options = AnalysisOptions {
        thresholds: Thresholds {
            max_selectors: 2,
            ..Thresholds::default()
        },
        ..AnalysisOptions::default()
    };
    let analyzer = CssAnalyzer::new(options);

    let two = ".a { color: #333; }\n.b { padding: 0; }";
    let result = analyzer.analyze(two, None).unwrap();
    assert!(result
        .issues
        .iter()
        .all(|i| i.kind != IssueKind::PerformanceUnusedCss));

    let three = ".a { color: #333; }\n.b { padding: 0; }\n.c { margin: 0; }";
    let result = analyzer.analyze(three, None).unwrap();
    let over: Vec<_> = result
        .issues
        .iter()
        .filter(|i| i.kind == IssueKind::PerformanceUnusedCss)
        .collect();
    assert_eq!(over.len(), 1);
    assert!(over[0].message.contains("3 selectors"));
}

#[test]
fn test_browser_targets_enable_compatibility_checks() {
    let silent = analyze_css(".g { display: grid; grid-template-columns: 1fr; }").unwrap();
    assert!(silent
        .issues
        .iter()
        .all(|i| i.kind != IssueKind::CompatibilityUnsupported));

    let options = AnalysisOptions {
        browsers: Some(vec!["ie 11".to_string()]),
        ..AnalysisOptions::default()
    };
    let analyzer = CssAnalyzer::new(options);
    let result = analyzer
        .analyze(".g { display: grid; grid-template-columns: 1fr; }", None)
        .unwrap();

    assert!(result
        .issues
        .iter()
        .any(|i| i.kind == IssueKind::CompatibilityUnsupported && i.severity == Severity::Info));
}

#[test]
fn test_scope_filter_limits_detection_but_not_metrics() {
    let options = AnalysisOptions {
        scope: Some(ScopeFilter {
            include_selectors: vec![".nav".to_string()],
            ..ScopeFilter::default()
        }),
        ..AnalysisOptions::default()
    };
    let analyzer = CssAnalyzer::new(options);

    let css = ".nav { top: 0; }\n.footer { top: 0; }";
    let result = analyzer.analyze(css, None).unwrap();

    // Only the in-scope rule reports, but metrics describe the whole sheet
    assert_eq!(result.summary.error_count, 1);
    assert_eq!(result.issues[0].location.selector.as_deref(), Some(".nav"));
    assert_eq!(result.metrics.selectors_count, 2);
}

#[test]
fn test_metrics_measure_the_source() {
    let css = "#main { color: #333; }\n.item { padding: 0; border: 0; }";
    let result = analyze_css(css).unwrap();

    assert_eq!(result.metrics.file_size_bytes, css.len());
    assert_eq!(result.metrics.selectors_count, 2);
    assert_eq!(result.metrics.properties_count, 3);
    assert_eq!(result.metrics.max_specificity, 100);
    // (100 + 10) / 2, rounded
    assert_eq!(result.metrics.avg_specificity, 55);
}

#[test]
fn test_suggestions_follow_detected_kinds() {
    let result = analyze_css("#a#b { color: red; }").unwrap();

    assert!(result
        .suggestions
        .refactoring
        .iter()
        .any(|s| s.contains("BEM")));
    assert!(result.suggestions.optimizations.is_empty());
    assert!(result.suggestions.modernization.is_empty());
}

#[test]
fn test_repeated_runs_report_the_same_findings() {
    let css = ".f { display: flex; align-items: center; }\n\
               #nav #menu a { color: red; }\n\
               a { color: blue; }";

    let first = analyze_css(css).unwrap();
    let second = analyze_css(css).unwrap();

    assert_eq!(first.summary, second.summary);
    assert_eq!(first.metrics, second.metrics);

    let fingerprint = |result: &undine::models::AnalysisResult| {
        result
            .issues
            .iter()
            .map(|i| (i.kind, i.severity, i.message.clone(), i.location.line))
            .collect::<Vec<_>>()
    };
    assert_eq!(fingerprint(&first), fingerprint(&second));
}

#[test]
fn test_json_report_uses_kebab_case_kinds() {
    let result = analyze_css("#a#b { color: red; }").unwrap();
    let json = serde_json::to_value(&result).expect("serializes");

    assert_eq!(json["issues"][0]["kind"], "specificity-conflict");
    assert_eq!(json["issues"][0]["severity"], "error");
    assert!(json["summary"]["total_issues"].as_u64().unwrap() >= 1);
    assert!(json["metrics"]["max_specificity"].as_u64().unwrap() == 200);
}

#[test]
fn test_pretty_report_includes_counts_and_metrics() {
    let result = analyze_css(".g { display: grid; }").unwrap();
    let report = PrettyFormatter::new().format_analysis(&result, Some("site.css"));

    assert!(report.contains("CSS analysis: site.css"));
    assert!(report.contains("Grid container has no template definition"));
    assert!(report.contains("selectors"));
    assert!(report.contains("Specificity: max"));
}

#[test]
fn test_markdown_report_sections() {
    let result = analyze_css(".g { display: grid; }").unwrap();
    let report = MarkdownFormatter.format_analysis(&result, Some("site.css"));

    assert!(report.contains("CSS Analysis Report: site.css"));
    assert!(report.contains("## 📊 Summary"));
    assert!(report.contains("## 📐 Metrics"));
    assert!(report.contains("### 🔴 Errors (1)"));
    assert!(report.contains("*Analysis completed with undine v"));
}

#[test]
fn test_markdown_report_for_a_clean_sheet() {
    let result = analyze_css(".card { color: #333; }").unwrap();
    let report = MarkdownFormatter.format_analysis(&result, None);

    assert!(report.contains("## ✅ No Issues Found"));
    assert!(report.contains("Your CSS code looks good! No problems detected."));
}

#[test]
fn test_analyze_command_writes_the_report_and_reports_errors() {
    let temp_dir = TempDir::new().expect("temp dir");
    let css_path = temp_dir.path().join("style.css");
    fs::write(&css_path, ".g { display: grid; }").expect("write stylesheet");
    let report_path = temp_dir.path().join("report.md");

    let args = AnalyzeArgs {
        format: Some("markdown".to_string()),
        output: Some(report_path.clone()),
        ..AnalyzeArgs::default()
    };
    let command = AnalyzeCommand::new(formatter_for("markdown"), Verbosity::Quiet);
    let code = command
        .execute(args, vec![css_path], &UndineConfig::default())
        .expect("command succeeds");

    assert_eq!(code, 2);
    let report = fs::read_to_string(report_path).expect("report exists");
    assert!(report.contains("Grid container has no template definition"));
}

#[test]
fn test_analyze_command_exit_codes_follow_severity() {
    let temp_dir = TempDir::new().expect("temp dir");
    let command = || AnalyzeCommand::new(formatter_for("json"), Verbosity::Quiet);

    let clean = temp_dir.path().join("clean.css");
    fs::write(&clean, ".a { color: #333; }").unwrap();
    let code = command()
        .execute(AnalyzeArgs::default(), vec![clean], &UndineConfig::default())
        .unwrap();
    assert_eq!(code, 0);

    let warning = temp_dir.path().join("warning.css");
    fs::write(&warning, ".f { display: flex; align-items: center; }").unwrap();
    let code = command()
        .execute(AnalyzeArgs::default(), vec![warning], &UndineConfig::default())
        .unwrap();
    assert_eq!(code, 1);

    let error = temp_dir.path().join("error.css");
    fs::write(&error, ".g { display: grid; }").unwrap();
    let code = command()
        .execute(AnalyzeArgs::default(), vec![error], &UndineConfig::default())
        .unwrap();
    assert_eq!(code, 2);
}

#[test]
fn test_analyze_command_flags_override_the_config() {
    let temp_dir = TempDir::new().expect("temp dir");
    let css_path = temp_dir.path().join("style.css");
    fs::write(&css_path, ".g { display: grid; }").unwrap();

    let args = AnalyzeArgs {
        no_layout: true,
        output: Some(temp_dir.path().join("report.txt")),
        ..AnalyzeArgs::default()
    };
    let command = AnalyzeCommand::new(formatter_for("pretty"), Verbosity::Quiet);
    let code = command
        .execute(args, vec![css_path], &UndineConfig::default())
        .unwrap();

    // With the layout checks disabled the grid error disappears
    assert_eq!(code, 0);
}

#[test]
fn test_analyze_command_without_files_is_an_error() {
    let command = AnalyzeCommand::new(formatter_for("pretty"), Verbosity::Quiet);
    let outcome = command.execute(AnalyzeArgs::default(), Vec::new(), &UndineConfig::default());

    assert!(matches!(outcome, Err(UndineError::Io(_))));
}
