use std::cell::RefCell;
use std::path::Path;

use anyhow::{anyhow, Result};
use tree_sitter::{Node, Parser, Query, QueryCursor, Tree};

use crate::analyzer::{self, node_text, unquote, Finding};
use crate::config::LintTables;
use crate::symbol_table::{Binding, SymbolTable, FILE_SCOPE};

// ============================================================================
// thread_local Parser reuse
// ============================================================================
//
// Parser::new() and set_language() involve native-layer initialization.
// One parser per thread amortizes that across every file a rayon worker
// processes.
//
// ============================================================================

thread_local! {
    static GO_PARSER: RefCell<Option<Parser>> = const { RefCell::new(None) };
}

fn with_parser<F, R>(language: &tree_sitter::Language, f: F) -> Result<R>
where
    F: FnOnce(&mut Parser) -> Result<R>,
{
    GO_PARSER.with(|cell| {
        let mut parser_opt = cell.borrow_mut();

        if parser_opt.is_none() {
            let mut parser = Parser::new();
            parser.set_language(language)
                .map_err(|e| anyhow!("Failed to set language: {e}"))?;
            *parser_opt = Some(parser);
        }

        let parser = parser_opt.as_mut().unwrap();
        f(parser)
    })
}

const IMPORT_QUERY: &str = r#"
    (import_spec
        name: (_)? @alias
        path: [(interpreted_string_literal) (raw_string_literal)] @path
    )
"#;

const PACKAGE_QUERY: &str = r#"
    (package_clause (package_identifier) @name)
"#;

/// Go frontend: parses one file and assembles the symbol table the core
/// engine resolves callees against. Queries compile once in new().
pub struct GoTreeSitterAnalyzer {
    language: tree_sitter::Language,
    import_query: Query,
    package_query: Query,
}

impl GoTreeSitterAnalyzer {
    pub fn new() -> Result<Self> {
        let language = tree_sitter_go::language();

        let import_query = Query::new(&language, IMPORT_QUERY)
            .map_err(|e| anyhow!("Failed to compile import query: {e}"))?;
        let package_query = Query::new(&language, PACKAGE_QUERY)
            .map_err(|e| anyhow!("Failed to compile package query: {e}"))?;

        Ok(Self {
            language,
            import_query,
            package_query,
        })
    }

    /// Parse `code` and run the full analysis over it.
    pub fn analyze(&self, code: &str, file_path: &Path, tables: &LintTables) -> Result<Vec<Finding>> {
        let tree = self.parse(code)?;
        let symbols = self.extract_symbols(&tree, code, tables);
        Ok(analyzer::analyze(&tree, code, file_path, &symbols, tables))
    }

    fn parse(&self, code: &str) -> Result<Tree> {
        with_parser(&self.language, |parser| {
            parser
                .parse(code, None)
                .ok_or_else(|| anyhow!("tree-sitter returned no tree"))
        })
    }

    // ========================================================================
    // Symbol extraction
    // ========================================================================

    /// Build the per-file symbol table: package name, import index, and
    /// scope-keyed variable bindings (logger-typed or opaque).
    pub fn extract_symbols(&self, tree: &Tree, code: &str, tables: &LintTables) -> SymbolTable {
        let mut symbols = SymbolTable::new();
        let root = tree.root_node();
        let bytes = code.as_bytes();

        let mut cursor = QueryCursor::new();
        for m in cursor.matches(&self.package_query, root, bytes) {
            for capture in m.captures {
                if let Ok(name) = capture.node.utf8_text(bytes) {
                    symbols.package = Some(name.to_string());
                }
            }
        }

        let alias_idx = self.import_query.capture_index_for_name("alias");
        let path_idx = self.import_query.capture_index_for_name("path");
        let mut cursor = QueryCursor::new();
        for m in cursor.matches(&self.import_query, root, bytes) {
            let mut alias: Option<&str> = None;
            let mut path: Option<&str> = None;
            for capture in m.captures {
                if Some(capture.index) == alias_idx {
                    alias = capture.node.utf8_text(bytes).ok();
                }
                if Some(capture.index) == path_idx {
                    path = capture.node.utf8_text(bytes).ok();
                }
            }
            if let Some(path) = path.and_then(unquote::unquote) {
                symbols.add_import(alias, &path);
            }
        }

        self.collect_bindings(root, code, tables, &mut symbols);

        symbols
    }

    /// One preorder walk over the tree registering declarations in source
    /// order, so a chained form like `l2 := logger.With(...)` sees the
    /// binding `logger` picked up earlier in the same walk.
    fn collect_bindings(&self, root: Node, code: &str, tables: &LintTables, symbols: &mut SymbolTable) {
        let mut cursor = root.walk();
        'walk: loop {
            let node = cursor.node();
            match node.kind() {
                "short_var_declaration" => {
                    self.bind_declaration(node, code, tables, symbols, true);
                }
                "assignment_statement" => {
                    // plain `=` introduces no name; only upgrade when the
                    // right side is a recognized logger expression
                    self.bind_declaration(node, code, tables, symbols, false);
                }
                "var_spec" | "const_spec" => {
                    self.bind_spec(node, code, tables, symbols);
                }
                "parameter_declaration" | "variadic_parameter_declaration" => {
                    self.bind_parameter(node, code, tables, symbols);
                }
                "range_clause" => {
                    self.bind_range(node, code, symbols);
                }
                _ => {}
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
    }

    /// `a, b := x, y` and `a = x`. With matching arity the sides pair up
    /// positionally; a multi-value call (`logger, _ := zap.NewProduction()`)
    /// binds logger-ness to the first name only.
    fn bind_declaration(
        &self,
        node: Node,
        code: &str,
        tables: &LintTables,
        symbols: &mut SymbolTable,
        declares: bool,
    ) {
        let Some(left) = node.child_by_field_name("left") else { return };
        let Some(right) = node.child_by_field_name("right") else { return };

        let mut walker = left.walk();
        let names: Vec<Node> = left
            .named_children(&mut walker)
            .filter(|n| n.kind() == "identifier")
            .collect();
        let mut walker = right.walk();
        let values: Vec<Node> = right.named_children(&mut walker).collect();

        let scope = current_scope(node);
        for (i, name_node) in names.iter().enumerate() {
            let Some(name) = node_text(*name_node, code) else { continue };
            if name == "_" {
                continue;
            }
            let value = if names.len() == values.len() {
                values.get(i)
            } else if i == 0 {
                values.first()
            } else {
                None
            };
            let logger_ns = value.and_then(|v| self.logger_source(*v, code, tables, symbols));
            match logger_ns {
                Some(ns) => symbols.bind(scope, name, Binding::Logger(ns)),
                None if declares => symbols.bind(scope, name, Binding::Opaque),
                None => {}
            }
        }
    }

    /// `var x *zap.Logger`, `var x = slog.Default()`, `const x = ...`
    fn bind_spec(&self, node: Node, code: &str, tables: &LintTables, symbols: &mut SymbolTable) {
        let scope = current_scope(node);
        let mut walker = node.walk();
        let names: Vec<Node> = node.children_by_field_name("name", &mut walker).collect();

        let type_ns = node
            .child_by_field_name("type")
            .and_then(|ty| self.logger_type_namespace(ty, code, tables, symbols));

        let values: Vec<Node> = match node.child_by_field_name("value") {
            Some(list) => {
                let mut walker = list.walk();
                list.named_children(&mut walker).collect()
            }
            None => Vec::new(),
        };

        for (i, name_node) in names.iter().enumerate() {
            let Some(name) = node_text(*name_node, code) else { continue };
            if name == "_" {
                continue;
            }
            let binding = if let Some(ns) = &type_ns {
                Binding::Logger(ns.clone())
            } else {
                let value = if names.len() == values.len() {
                    values.get(i)
                } else if i == 0 {
                    values.first()
                } else {
                    None
                };
                match value.and_then(|v| self.logger_source(*v, code, tables, symbols)) {
                    Some(ns) => Binding::Logger(ns),
                    None => Binding::Opaque,
                }
            };
            symbols.bind(scope, name, binding);
        }
    }

    /// Parameters and method receivers, e.g. `func serve(log *slog.Logger)`
    fn bind_parameter(&self, node: Node, code: &str, tables: &LintTables, symbols: &mut SymbolTable) {
        let scope = current_scope(node);
        let type_ns = node
            .child_by_field_name("type")
            .and_then(|ty| self.logger_type_namespace(ty, code, tables, symbols));

        let mut walker = node.walk();
        for name_node in node.children_by_field_name("name", &mut walker) {
            let Some(name) = node_text(name_node, code) else { continue };
            if name == "_" {
                continue;
            }
            let binding = match &type_ns {
                Some(ns) => Binding::Logger(ns.clone()),
                None => Binding::Opaque,
            };
            symbols.bind(scope, name, binding);
        }
    }

    /// `for i, v := range xs` declares i and v
    fn bind_range(&self, node: Node, code: &str, symbols: &mut SymbolTable) {
        let Some(left) = node.child_by_field_name("left") else { return };
        let scope = current_scope(node);
        let mut walker = left.walk();
        for name_node in left.named_children(&mut walker) {
            if name_node.kind() != "identifier" {
                continue;
            }
            let Some(name) = node_text(name_node, code) else { continue };
            if name == "_" {
                continue;
            }
            symbols.bind(scope, name, Binding::Opaque);
        }
    }

    /// Namespace of the logger produced by `expr`, if any.
    ///
    /// Two shapes count: a constructor call on an imported logging package
    /// (`zap.NewProduction()`) and a chaining call on an already-tracked
    /// logger variable (`logger.With(...)`, `logger.Sugar()`).
    fn logger_source(
        &self,
        expr: Node,
        code: &str,
        tables: &LintTables,
        symbols: &SymbolTable,
    ) -> Option<String> {
        let mut expr = expr;
        while expr.kind() == "parenthesized_expression" {
            expr = expr.named_child(0)?;
        }
        if expr.kind() != "call_expression" {
            return None;
        }

        let callee = expr.child_by_field_name("function")?;
        if callee.kind() != "selector_expression" {
            return None;
        }
        let operand = callee.child_by_field_name("operand")?;
        if operand.kind() != "identifier" {
            return None;
        }

        let operand_name = node_text(operand, code)?;
        let method = node_text(callee.child_by_field_name("field")?, code)?;
        let scopes = analyzer::scope_chain(expr);

        // a tracked logger variable wins over an import alias of the
        // same name, mirroring classifier resolution
        for scope in scopes.iter().rev() {
            match symbols.binding(*scope, operand_name) {
                Some(Binding::Logger(ns)) => {
                    return tables.is_chain_method(method).then(|| ns.clone());
                }
                Some(Binding::Opaque) => return None,
                None => {}
            }
        }

        let path = symbols.imports().resolve(operand_name)?;
        tables
            .is_logger_ctor(path, method)
            .then(|| path.to_string())
    }

    /// Namespace for a logger-typed declaration, unwrapping one level of
    /// pointer: `*zap.Logger`, `zap.SugaredLogger`, `*slog.Logger`.
    fn logger_type_namespace(
        &self,
        ty: Node,
        code: &str,
        tables: &LintTables,
        symbols: &SymbolTable,
    ) -> Option<String> {
        let ty = if ty.kind() == "pointer_type" {
            ty.named_child(0)?
        } else {
            ty
        };
        if ty.kind() != "qualified_type" {
            return None;
        }

        let pkg = node_text(ty.child_by_field_name("package")?, code)?;
        let name = node_text(ty.child_by_field_name("name")?, code)?;
        let path = symbols.imports().resolve(pkg)?;

        tables.is_logger_type(path, name).then(|| path.to_string())
    }
}

/// Innermost enclosing function scope for a declaration node.
fn current_scope(node: Node) -> usize {
    let mut current = node;
    while let Some(parent) = current.parent() {
        if matches!(
            parent.kind(),
            "function_declaration" | "method_declaration" | "func_literal"
        ) {
            return parent.start_byte();
        }
        current = parent;
    }
    FILE_SCOPE
}
