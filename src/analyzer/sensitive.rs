//! Sensitive data scanning
//!
//! Walks every argument of a matched logging call looking for
//! credential-looking content. Two shapes are inspected: string literals
//! (the decoded text) and simple references (the identifier or field
//! name itself). String concatenation is unwrapped so a literal prefix
//! glued to a secret variable reports both halves. Everything else -
//! function calls, indexing, composite literals - stays opaque.

use tree_sitter::Node;

use crate::config::LintTables;
use crate::rules::{self, SENSITIVE_LITERAL, SENSITIVE_VAR};

use super::{node_text, unquote, Finding};

/// Scan the full ordered argument list of a matched call.
pub fn scan_arguments(
    args: &[Node],
    source: &str,
    file: &str,
    tables: &LintTables,
    findings: &mut Vec<Finding>,
) {
    for arg in args {
        scan_expression(*arg, source, file, tables, findings);
    }
}

/// Walk one argument expression with an explicit work-list, so a
/// pathologically deep concatenation chain costs heap, not call stack.
/// Operands are pushed right-before-left to keep reporting left-to-right.
fn scan_expression(
    root: Node,
    source: &str,
    file: &str,
    tables: &LintTables,
    findings: &mut Vec<Finding>,
) {
    let mut work = vec![root];

    while let Some(node) = work.pop() {
        match node.kind() {
            "interpreted_string_literal" | "raw_string_literal" => {
                if !tables.is_rule_enabled(SENSITIVE_LITERAL) {
                    continue;
                }
                // undecodable literal: skip, no finding
                let Some(decoded) = node_text(node, source).and_then(unquote::unquote) else {
                    continue;
                };
                for keyword in keyword_hits(&decoded, tables.keywords()) {
                    findings.push(Finding::at(
                        SENSITIVE_LITERAL,
                        rules::registry().severity_of(SENSITIVE_LITERAL),
                        node,
                        file,
                        format!("log message contains sensitive data: {keyword}"),
                    ));
                }
            }
            "identifier" | "field_identifier" => {
                if !tables.is_rule_enabled(SENSITIVE_VAR) {
                    continue;
                }
                let Some(name) = node_text(node, source) else { continue };
                for keyword in keyword_hits(name, tables.keywords()) {
                    findings.push(Finding::at(
                        SENSITIVE_VAR,
                        rules::registry().severity_of(SENSITIVE_VAR),
                        node,
                        file,
                        format!("attempt to log sensitive variable: {keyword}"),
                    ));
                }
            }
            "selector_expression" => {
                // cfg.Password: the base and the field are both names
                if let Some(field) = node.child_by_field_name("field") {
                    work.push(field);
                }
                if let Some(operand) = node.child_by_field_name("operand") {
                    if matches!(operand.kind(), "identifier" | "selector_expression") {
                        work.push(operand);
                    }
                }
            }
            "binary_expression" => {
                let is_concat = node
                    .child_by_field_name("operator")
                    .map(|op| op.kind() == "+")
                    .unwrap_or(false);
                if is_concat {
                    if let Some(right) = node.child_by_field_name("right") {
                        work.push(right);
                    }
                    if let Some(left) = node.child_by_field_name("left") {
                        work.push(left);
                    }
                }
            }
            "parenthesized_expression" => {
                if let Some(inner) = node.named_child(0) {
                    work.push(inner);
                }
            }
            // every other expression shape is out of bounds for this scan
            _ => {}
        }
    }
}

/// All keywords contained in `text`, case-insensitive, in table order.
/// Matching is plain substring containment: "secretKey" hits "secret",
/// "userToken" hits "token".
pub fn keyword_hits<'a>(text: &str, keywords: &'a [String]) -> Vec<&'a str> {
    let lower = text.to_lowercase();
    keywords
        .iter()
        .filter(|k| lower.contains(k.as_str()))
        .map(String::as_str)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_keywords() -> Vec<String> {
        crate::config::LintTables::default()
            .keywords()
            .to_vec()
    }

    #[test]
    fn test_keyword_hits_case_insensitive() {
        let keywords = default_keywords();
        assert_eq!(keyword_hits("using api_key", &keywords), vec!["api_key"]);
        assert_eq!(keyword_hits("Token is set", &keywords), vec!["token"]);
        assert_eq!(keyword_hits("secretKey", &keywords), vec!["secret"]);
        assert_eq!(keyword_hits("userToken", &keywords), vec!["token"]);
        assert!(keyword_hits("request processed", &keywords).is_empty());
    }

    #[test]
    fn test_keyword_hits_accumulate() {
        let keywords = default_keywords();
        assert_eq!(
            keyword_hits("password and token", &keywords),
            vec!["password", "token"]
        );
    }
}
