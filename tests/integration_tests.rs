// ============================================================================
// Integration Tests - Full-file analysis and project scanning
// ============================================================================
//
// These tests verify that the pipeline as a whole:
// 1. Produces the expected ordered finding sequence over a known corpus
// 2. Is deterministic across repeated runs
// 3. Honors suppression directives and .logcheck.yml overlays
// 4. Skips vendor/ trees during project scans

use std::fs;

use logcheck::rules::Severity;
use logcheck::scan_engine::{scan_project, scan_source};

mod common {
    use std::path::PathBuf;

    /// Helper to get the fixtures directory path
    pub fn fixtures_dir() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
    }

    /// Helper to get the convention-sample fixture path
    pub fn convention_sample() -> PathBuf {
        fixtures_dir().join("convention-sample")
    }
}

// ============================================================================
// Known-corpus analysis
// ============================================================================

#[test]
fn test_convention_sample_findings() {
    let fixture = common::convention_sample().join("main.go");
    let code = fs::read_to_string(&fixture).expect("fixture should exist");

    let findings = scan_source(&code, "main.go").expect("analysis should succeed");

    let rendered: String = findings
        .iter()
        .map(|f| format!("{} {} {}\n", f.line, f.id, f.message))
        .collect();

    insta::assert_snapshot!(rendered, @r"
    10 MSG_UPPERCASE_START the log message must begin with a lowercase letter
    15 MSG_NON_ENGLISH the log message must be in English only
    16 MSG_NON_ENGLISH the log message must be in English only
    19 MSG_SPECIAL_CHARS the log message must not contain special characters or emojis
    20 MSG_SPECIAL_CHARS the log message must not contain special characters or emojis
    21 MSG_SPECIAL_CHARS the log message must not contain special characters or emojis
    22 MSG_SPECIAL_CHARS the log message must not contain special characters or emojis
    23 MSG_SPECIAL_CHARS the log message must not contain special characters or emojis
    29 SENSITIVE_LITERAL log message contains sensitive data: api_key
    30 MSG_UPPERCASE_START the log message must begin with a lowercase letter
    30 SENSITIVE_LITERAL log message contains sensitive data: token
    39 SENSITIVE_LITERAL log message contains sensitive data: password
    39 SENSITIVE_VAR attempt to log sensitive variable: password
    40 SENSITIVE_VAR attempt to log sensitive variable: secret
    41 SENSITIVE_VAR attempt to log sensitive variable: token
    43 MSG_UPPERCASE_START the log message must begin with a lowercase letter
    ");
}

#[test]
fn test_multi_violation_message_reports_all_rules() {
    let code = r#"
package main

import "log/slog"

func main() {
	slog.Info("Token is set")
}
"#;
    let findings = scan_source(code, "multi.go").expect("analysis should succeed");
    let ids: Vec<&str> = findings.iter().map(|f| f.id.as_str()).collect();

    // message rules first, then the sensitive scan, all from one call
    assert_eq!(ids, vec!["MSG_UPPERCASE_START", "SENSITIVE_LITERAL"]);
    assert_eq!(findings[0].severity, Severity::P1);
    assert_eq!(findings[1].severity, Severity::P0);
}

#[test]
fn test_analysis_is_idempotent_over_the_corpus() {
    let fixture = common::convention_sample().join("main.go");
    let code = fs::read_to_string(&fixture).expect("fixture should exist");

    let first = scan_source(&code, "main.go").expect("first run");
    let second = scan_source(&code, "main.go").expect("second run");

    assert_eq!(first, second);
}

// ============================================================================
// Suppression directives
// ============================================================================

#[test]
fn test_inline_suppression_filters_findings() {
    let code = r#"
package main

import "log/slog"

func main() {
	slog.Info("Starting server") // logcheck-ignore: MSG_UPPERCASE_START
	slog.Info("Stopping server")
	// logcheck-ignore-next-line: SENSITIVE_LITERAL
	slog.Info("rotating api_key")
	slog.Warn("failed!!!") //nolint:logcheck
}
"#;
    let findings = scan_source(code, "suppressed.go").expect("analysis should succeed");
    let lines: Vec<usize> = findings.iter().map(|f| f.line).collect();

    // only the unsuppressed uppercase violation on line 8 remains
    assert_eq!(lines, vec![8]);
    assert_eq!(findings[0].id, "MSG_UPPERCASE_START");
}

#[test]
fn test_file_level_suppression() {
    let code = r#"
// logcheck-ignore-file
package main

import "log/slog"

func main() {
	slog.Info("Terrible Message!!!")
	slog.Info("the password is hunter2")
}
"#;
    let findings = scan_source(code, "ignored.go").expect("analysis should succeed");
    assert!(findings.is_empty());
}

// ============================================================================
// Project scanning
// ============================================================================

#[test]
fn test_scan_project_over_fixture_dir() {
    let fixture = common::convention_sample();
    if !fixture.exists() {
        eprintln!("Skipping test: fixture directory not found at {:?}", fixture);
        return;
    }

    let report = scan_project(fixture.to_str().unwrap()).expect("scan should succeed");

    assert_eq!(report.files_scanned, 1);
    assert_eq!(report.p0_count, 6);
    assert_eq!(report.p1_count, 10);

    // deterministic ordering: sorted by position, evaluation order preserved
    // for findings at the same position
    let mut sorted = report.findings.clone();
    sorted.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then(a.line.cmp(&b.line))
            .then(a.column.cmp(&b.column))
    });
    assert_eq!(report.findings, sorted);
}

#[test]
fn test_scan_skips_vendor_and_reads_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();

    fs::create_dir_all(root.join("vendor/somedep")).unwrap();
    fs::write(
        root.join("vendor/somedep/dep.go"),
        "package somedep\n\nimport \"log/slog\"\n\nfunc init() {\n\tslog.Info(\"Vendored Noise!!!\")\n}\n",
    )
    .unwrap();

    fs::write(
        root.join("main.go"),
        "package main\n\nimport \"log/slog\"\n\nfunc main() {\n\tslog.Info(\"checking credential store\")\n\tslog.Warn(\"wait...\")\n}\n",
    )
    .unwrap();

    fs::write(
        root.join(".logcheck.yml"),
        "extra_keywords: [credential]\ndisabled_rules: [MSG_SPECIAL_CHARS]\n",
    )
    .unwrap();

    let report = scan_project(root.to_str().unwrap()).expect("scan should succeed");

    // vendor/ never contributes findings
    assert!(report.findings.iter().all(|f| !f.file.contains("vendor")));
    // the extra keyword fires, the disabled rule does not
    let ids: Vec<&str> = report.findings.iter().map(|f| f.id.as_str()).collect();
    assert_eq!(ids, vec!["SENSITIVE_LITERAL"]);
    assert!(report.findings[0].message.contains("credential"));
    assert_eq!(report.files_scanned, 1);
}

#[test]
fn test_scan_survives_a_malformed_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let root = dir.path();

    fs::write(root.join("broken.go"), "func ) nope {{{ import \"log/slog\"").unwrap();
    fs::write(
        root.join("ok.go"),
        "package main\n\nimport \"log/slog\"\n\nfunc main() {\n\tslog.Info(\"Bad Start\")\n}\n",
    )
    .unwrap();

    let report = scan_project(root.to_str().unwrap()).expect("scan should succeed");

    // the broken file yields nothing; the healthy file still reports
    assert_eq!(report.files_scanned, 2);
    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].file, root.join("ok.go").display().to_string());
}
