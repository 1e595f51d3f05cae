// ============================================================================
// Core analysis engine
// ============================================================================
//
// A pure, synchronous pass over one parsed file:
//
//   analyze(tree, source, file, symbols, tables) -> Vec<Finding>
//
// The walker visits every call expression exactly once, preorder. The
// classifier filters down to registered logging calls using the symbol
// table. On a match the message rules and the sensitive-data scan both
// run, independently. Nothing in here reads files, resolves names or
// mutates shared state, so the scan engine is free to run this across
// files on as many threads as it likes with one shared table reference.
//
// ============================================================================

pub mod classify;
pub mod message_rules;
pub mod sensitive;
pub mod unquote;

use std::path::Path;

use serde::Serialize;
use tree_sitter::{Node, Tree};

use crate::config::LintTables;
use crate::rules::{self, Severity};
use crate::symbol_table::{SymbolTable, FILE_SCOPE};

/// One reported rule violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Rule identifier, e.g. "SENSITIVE_VAR"
    pub id: String,
    pub severity: Severity,
    pub file: String,
    /// 1-based
    pub line: usize,
    /// 1-based
    pub column: usize,
    /// Human-readable description of this violation
    pub message: String,
}

impl Finding {
    fn at(id: &str, severity: Severity, node: Node, file: &str, message: String) -> Self {
        let pos = node.start_position();
        Self {
            id: id.to_string(),
            severity,
            file: file.to_string(),
            line: pos.row + 1,
            column: pos.column + 1,
            message,
        }
    }

    /// `file:line:col` prefix for rendering
    pub fn location(&self) -> String {
        format!("{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Analyze one parsed file.
///
/// Findings come back in evaluation order: calls in preorder position,
/// message rules before sensitive-data rules per call, arguments
/// left-to-right. Running the same tree and symbols twice yields the
/// identical sequence.
pub fn analyze(
    tree: &Tree,
    source: &str,
    file: &Path,
    symbols: &SymbolTable,
    tables: &LintTables,
) -> Vec<Finding> {
    let file = file.display().to_string();
    let mut findings = Vec::new();

    // iterative preorder walk; a malformed subtree just yields fewer
    // call nodes, it never aborts the pass
    let mut cursor = tree.root_node().walk();
    'walk: loop {
        let node = cursor.node();
        if node.kind() == "call_expression" {
            check_call(node, source, &file, symbols, tables, &mut findings);
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                continue 'walk;
            }
            if !cursor.goto_parent() {
                break 'walk;
            }
        }
    }

    findings
}

/// Classify one call and dispatch both rule engines on a match.
fn check_call(
    call: Node,
    source: &str,
    file: &str,
    symbols: &SymbolTable,
    tables: &LintTables,
    findings: &mut Vec<Finding>,
) {
    let scopes = scope_chain(call);
    let Some(log_call) = classify::classify(call, source, symbols, tables, &scopes) else {
        return;
    };
    tracing::trace!(
        namespace = %log_call.namespace,
        method = %log_call.method,
        message_index = log_call.message_index,
        "matched logging call"
    );

    // content rules only apply to a literal message; a computed message
    // is not statically checkable and silently skips them
    if matches!(
        log_call.message.kind(),
        "interpreted_string_literal" | "raw_string_literal"
    ) {
        let decoded = node_text(log_call.message, source).and_then(unquote::unquote);
        if let Some(decoded) = decoded {
            for id in message_rules::violations(&decoded, tables) {
                let rule = rules::registry().get(id);
                findings.push(Finding::at(
                    id,
                    rule.map(|r| r.severity).unwrap_or(Severity::P1),
                    log_call.message,
                    file,
                    rule.map(|r| r.description).unwrap_or(id).to_string(),
                ));
            }
        }
    }

    sensitive::scan_arguments(&log_call.args, source, file, tables, findings);
}

/// Scope chain for a node: FILE_SCOPE first, then each enclosing function
/// (declaration, method or literal) outermost-first, keyed by start byte
/// exactly as the symbol extractor keys bindings.
pub(crate) fn scope_chain(node: Node) -> Vec<usize> {
    let mut enclosing = Vec::new();
    let mut current = node;
    while let Some(parent) = current.parent() {
        if matches!(
            parent.kind(),
            "function_declaration" | "method_declaration" | "func_literal"
        ) {
            enclosing.push(parent.start_byte());
        }
        current = parent;
    }

    let mut scopes = Vec::with_capacity(enclosing.len() + 1);
    scopes.push(FILE_SCOPE);
    scopes.extend(enclosing.into_iter().rev());
    scopes
}

pub(crate) fn node_text<'a>(node: Node, source: &'a str) -> Option<&'a str> {
    node.utf8_text(source.as_bytes()).ok()
}
