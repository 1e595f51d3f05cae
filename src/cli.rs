//! CLI command handlers
//!
//! Human-readable markdown by default, JSON with --json.

use anyhow::Result;
use clap::Subcommand;
use serde_json::json;

use crate::analyzer::Finding;
use crate::rules::{self, Severity};
use crate::scan_engine::{self, ScanReport};

/// CLI Commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// 🛰️ Scan a project tree for logging convention violations
    Scan {
        /// Project path
        #[arg(short, long, default_value = ".")]
        path: String,

        /// Show P1 warnings too (default shows only P0)
        #[arg(long)]
        full: bool,

        /// Max P1 warnings to print in --full mode
        #[arg(long, default_value = "20")]
        max_warn: usize,
    },

    /// 🔍 Analyze a single Go file
    Analyze {
        /// File path
        #[arg(short, long)]
        file: String,
    },

    /// 📋 List all registered rules
    Rules,

    /// ℹ️ Engine status
    Status,
}

/// Handle a CLI command.
///
/// Scans exit with code 1 when P0 findings survive suppression, so CI
/// pipelines can gate on the binary alone.
pub fn handle_command(cmd: Command, json_output: bool) -> Result<()> {
    match cmd {
        Command::Scan { path, full, max_warn } => {
            let report = scan_engine::scan_project(&path)?;
            if json_output {
                print_json(&json!({ "success": true, "data": &report }))?;
            } else {
                println!("{}", render_report(&report, !full, max_warn));
            }
            if report.p0_count > 0 {
                std::process::exit(1);
            }
        }

        Command::Analyze { file } => {
            let content = std::fs::read_to_string(&file)?;
            let findings = scan_engine::scan_source(&content, &file)?;
            let has_p0 = findings.iter().any(|f| f.severity == Severity::P0);
            if json_output {
                print_json(&json!({ "success": true, "data": findings }))?;
            } else {
                println!("{}", render_findings(&file, &findings));
            }
            if has_p0 {
                std::process::exit(1);
            }
        }

        Command::Rules => {
            if json_output {
                let rules: Vec<_> = rules::registry()
                    .all()
                    .map(|r| {
                        json!({
                            "id": r.id,
                            "category": r.category.as_str(),
                            "severity": r.severity,
                            "description": r.description,
                            "rationale": r.rationale,
                            "fix": r.fix_suggestion,
                        })
                    })
                    .collect();
                print_json(&json!({ "success": true, "data": rules }))?;
            } else {
                println!("{}", render_rules());
            }
        }

        Command::Status => {
            let version = env!("CARGO_PKG_VERSION");
            let stats = rules::registry().stats();
            if json_output {
                print_json(&json!({
                    "success": true,
                    "data": {
                        "version": version,
                        "engine": "Tree-sitter AST",
                        "rules": stats,
                    }
                }))?;
            } else {
                println!(
                    "logcheck v{}\n\
                    Engine: Tree-sitter AST (Go)\n\
                    Rules: {} ({} message style, {} sensitive data)\n\
                    Loggers: log/slog, log, go.uber.org/zap (+ .logcheck.yml extras)",
                    version, stats.total, stats.message_count, stats.argument_count
                );
            }
        }
    }

    Ok(())
}

fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Markdown scan report.
///
/// compact: only P0 findings, one line each.
fn render_report(report: &ScanReport, compact: bool, max_warn: usize) -> String {
    let mut out = format!(
        "## 🛰️ logcheck scan\n\n**P0**: {} | **P1**: {} | **files**: {}\n\n",
        report.p0_count, report.p1_count, report.files_scanned
    );

    let p0: Vec<&Finding> = report
        .findings
        .iter()
        .filter(|f| f.severity == Severity::P0)
        .collect();

    if p0.is_empty() {
        out.push_str("✅ no sensitive data leaks\n");
    } else {
        out.push_str("### 🔴 P0 sensitive data\n\n");
        for finding in &p0 {
            out.push_str(&format!(
                "- `{}` {} - {}\n",
                finding.id,
                finding.location(),
                finding.message
            ));
        }
    }

    let p1_total = report.p1_count;
    if compact {
        if p1_total > 0 {
            out.push_str(&format!(
                "\n*({p1_total} P1 warnings omitted, re-run with --full to see them)*\n"
            ));
        }
    } else if p1_total > 0 {
        out.push_str(&format!("\n### 🟡 P1 style (showing up to {max_warn})\n\n"));
        for finding in report
            .findings
            .iter()
            .filter(|f| f.severity == Severity::P1)
            .take(max_warn)
        {
            out.push_str(&format!(
                "- `{}` {} - {}\n",
                finding.id,
                finding.location(),
                finding.message
            ));
        }
    }

    out
}

/// Single-file listing, one finding per line.
fn render_findings(file: &str, findings: &[Finding]) -> String {
    let mut out = format!("## 🔍 {file}\n\n");

    if findings.is_empty() {
        out.push_str("✅ no logging convention violations\n");
        return out;
    }

    for finding in findings {
        let marker = match finding.severity {
            Severity::P0 => "🔴",
            Severity::P1 => "🟡",
        };
        out.push_str(&format!(
            "{} **{}** (line {}) - {}\n",
            marker, finding.id, finding.line, finding.message
        ));
    }

    out
}

fn render_rules() -> String {
    let mut out = String::from("## 📋 logcheck rules\n\n");

    for category in [rules::Category::SensitiveData, rules::Category::MessageStyle] {
        out.push_str(&format!("### {}\n\n", category.as_str()));
        let mut defs = rules::registry().by_category(category);
        defs.sort_by_key(|r| r.id);
        for rule in defs {
            let sev = match rule.severity {
                Severity::P0 => "P0",
                Severity::P1 => "P1",
            };
            out.push_str(&format!(
                "- **{}** [{}] - {}\n  - why: {}\n  - fix: {}\n",
                rule.id, sev, rule.description, rule.rationale, rule.fix_suggestion
            ));
        }
        out.push('\n');
    }

    out
}
