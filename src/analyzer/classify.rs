//! Call classification
//!
//! Decides whether a call expression targets a registered logging method,
//! and if so which argument carries the human-readable message. The
//! decision runs entirely on resolved symbol information: the operand of
//! the selector must bind to a known logging package (directly or through
//! a tracked logger variable). The literal spelling of the operand is
//! never consulted, so a local variable that happens to be named `log` or
//! `slog` classifies by what it is bound to, not by its name.

use tree_sitter::Node;

use crate::config::LintTables;
use crate::symbol_table::{Resolution, SymbolTable};

use super::node_text;

/// A call that was positively identified as a logging call
pub struct LogCall<'t> {
    /// Declaring package path of the callee, e.g. "go.uber.org/zap"
    pub namespace: String,
    /// Method name, e.g. "InfoContext"
    pub method: String,
    /// Index of the message argument in `args`
    pub message_index: usize,
    /// The message argument expression
    pub message: Node<'t>,
    /// The full ordered argument list
    pub args: Vec<Node<'t>>,
}

/// Classify one `call_expression` node.
///
/// Returns None for everything that is not a fully-resolved logging call:
/// non-selector callees, operands with no symbol binding, shadowed names,
/// unregistered namespaces or methods, and calls with too few arguments
/// to even contain the message. None is a skip, never an error.
pub fn classify<'t>(
    call: Node<'t>,
    source: &str,
    symbols: &SymbolTable,
    tables: &LintTables,
    scopes: &[usize],
) -> Option<LogCall<'t>> {
    let callee = call.child_by_field_name("function")?;
    if callee.kind() != "selector_expression" {
        return None;
    }

    let operand = callee.child_by_field_name("operand")?;
    if operand.kind() != "identifier" {
        // chained expressions like build().Info(...) carry no binding we track
        return None;
    }

    let operand_name = node_text(operand, source)?;
    let namespace = match symbols.resolve(operand_name, scopes) {
        Resolution::Namespace(ns) => ns.to_string(),
        Resolution::Shadowed | Resolution::Unknown => return None,
    };

    let method = node_text(callee.child_by_field_name("field")?, source)?;
    let message_index = tables.message_index(&namespace, method)?;

    let args_node = call.child_by_field_name("arguments")?;
    let mut walker = args_node.walk();
    let args: Vec<Node<'t>> = args_node
        .named_children(&mut walker)
        .filter(|n| n.kind() != "comment")
        .collect();

    if args.len() <= message_index {
        return None;
    }

    Some(LogCall {
        namespace,
        method: method.to_string(),
        message_index,
        message: args[message_index],
        args,
    })
}
