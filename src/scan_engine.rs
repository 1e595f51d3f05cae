//! Scan engine
//!
//! Drives the per-file analyzer over a whole project tree:
//! - collect .go files (vendor/ and hidden directories skipped)
//! - parallel analysis (rayon), one thread-local parser per worker
//! - suppression directives filtered per file
//! - findings sorted (file, line, column) so reports are deterministic
//!   regardless of worker scheduling

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{bail, Result};
use rayon::prelude::*;
use serde::Serialize;
use walkdir::{DirEntry, WalkDir};

use crate::analyzer::Finding;
use crate::config::{LintConfig, LintTables};
use crate::rules::suppression::SuppressionContext;
use crate::rules::Severity;
use crate::scanner::GoTreeSitterAnalyzer;

/// Result of one scan run
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub root: String,
    pub files_scanned: usize,
    pub p0_count: usize,
    pub p1_count: usize,
    pub findings: Vec<Finding>,
}

/// Scan a project directory (or a single file path).
///
/// Configuration is read once from `.logcheck.yml` at the scan root; the
/// resulting tables are shared read-only across all workers.
pub fn scan_project(code_path: &str) -> Result<ScanReport> {
    let path = Path::new(code_path);
    if !path.exists() {
        bail!("path not found: {code_path}");
    }

    let config_dir = if path.is_dir() {
        path
    } else {
        path.parent().unwrap_or_else(|| Path::new("."))
    };
    let config = LintConfig::load(config_dir).unwrap_or_else(|e| {
        tracing::warn!("ignoring unusable config: {e:#}");
        LintConfig::default()
    });
    let tables = LintTables::new(&config);

    let analyzer = Arc::new(GoTreeSitterAnalyzer::new()?);

    let files: Vec<PathBuf> = if path.is_dir() {
        WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| !is_skipped_dir(e))
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file() && is_go_file(e.path()))
            .map(|e| e.into_path())
            .collect()
    } else {
        vec![path.to_path_buf()]
    };

    let file_count = files.len();
    let findings: Mutex<Vec<Finding>> = Mutex::new(Vec::new());

    files.par_iter().for_each(|file_path| {
        let Ok(content) = std::fs::read_to_string(file_path) else {
            tracing::debug!("unreadable file skipped: {}", file_path.display());
            return;
        };

        match analyzer.analyze(&content, file_path, &tables) {
            Ok(mut local) => {
                let suppressions = SuppressionContext::parse(&content);
                local.retain(|f| !suppressions.is_suppressed(&f.id, f.line));

                if !local.is_empty() {
                    // unwrap_or_else covers a poisoned mutex if a worker panicked
                    let mut global = findings.lock().unwrap_or_else(|e| e.into_inner());
                    global.extend(local);
                }
            }
            Err(e) => tracing::warn!("skipping {}: {e:#}", file_path.display()),
        }
    });

    let mut findings = findings.into_inner().unwrap_or_else(|e| e.into_inner());
    // stable sort: equal positions keep their in-file evaluation order
    findings.sort_by(|a, b| {
        a.file
            .cmp(&b.file)
            .then(a.line.cmp(&b.line))
            .then(a.column.cmp(&b.column))
    });

    Ok(build_report(code_path, file_count, findings))
}

/// Analyze one in-memory compilation unit with default tables.
/// Suppression directives in the source still apply.
pub fn scan_source(code: &str, file_path: &str) -> Result<Vec<Finding>> {
    let analyzer = GoTreeSitterAnalyzer::new()?;
    let tables = &*crate::config::DEFAULT_TABLES;

    let mut findings = analyzer.analyze(code, Path::new(file_path), tables)?;
    let suppressions = SuppressionContext::parse(code);
    findings.retain(|f| !suppressions.is_suppressed(&f.id, f.line));

    Ok(findings)
}

fn build_report(root: &str, files_scanned: usize, findings: Vec<Finding>) -> ScanReport {
    let p0_count = findings.iter().filter(|f| f.severity == Severity::P0).count();
    let p1_count = findings.iter().filter(|f| f.severity == Severity::P1).count();

    ScanReport {
        root: root.to_string(),
        files_scanned,
        p0_count,
        p1_count,
        findings,
    }
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_dir() {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name == "vendor" || (name.starts_with('.') && name != ".")
}

fn is_go_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some("go")
}
