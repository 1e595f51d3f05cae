// ============================================================================
// Symbol table - lightweight per-file name resolution
// ============================================================================

use std::collections::HashMap;
use serde::{Serialize, Deserialize};

/// Scope id for package-level declarations. Function scopes use the start
/// byte of their declaration node, which is never 0 in a valid Go file
/// (the package clause comes first).
pub const FILE_SCOPE: usize = 0;

// ============================================================================
// ImportIndex - Per-file import resolution index
// ============================================================================

/// Import resolution index for a single Go file
///
/// Maps the reference name a file uses for a package to that package's
/// import path. The reference name is the explicit alias when present,
/// otherwise the last path segment (skipping `/vN` version suffixes).
/// Blank (`_`) and dot (`.`) imports bind no reference name and are
/// dropped; a dot-imported logger cannot be classified statically here.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportIndex {
    /// reference name -> import path, e.g. "zap" -> "go.uber.org/zap"
    entries: HashMap<String, String>,
}

impl ImportIndex {
    /// Register one import spec
    pub fn add(&mut self, alias: Option<&str>, path: &str) {
        match alias {
            Some("_") | Some(".") => {}
            Some(name) => {
                self.entries.insert(name.to_string(), path.to_string());
            }
            None => {
                if let Some(name) = default_reference_name(path) {
                    self.entries.insert(name.to_string(), path.to_string());
                }
            }
        }
    }

    /// Import path for a reference name, if the file imports it
    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Reference name implied by an import path with no alias:
/// the last segment, except that major-version suffixes point one
/// segment back ("github.com/x/mod/v2" -> "mod").
fn default_reference_name(path: &str) -> Option<&str> {
    let mut segments = path.rsplit('/');
    let last = segments.next()?;
    let is_version = last.len() > 1
        && last.starts_with('v')
        && last[1..].chars().all(|c| c.is_ascii_digit());
    if is_version {
        segments.next().or(Some(last))
    } else {
        Some(last)
    }
}

// ============================================================================
// Variable bindings
// ============================================================================

/// What a local name is bound to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Binding {
    /// A variable holding a logger from this namespace
    /// (e.g. `logger, _ := zap.NewProduction()`)
    Logger(String),
    /// Any other declaration. Shadows an import alias of the same name,
    /// so the call is skipped rather than misclassified.
    Opaque,
}

/// Outcome of resolving a selector operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// The name statically binds to a registered logging namespace
    Namespace(&'a str),
    /// The name binds to a non-logger local; never a logging call
    Shadowed,
    /// No binding information; skipped, never guessed
    Unknown,
}

/// Per-file symbol table: import index plus scope-keyed variable bindings.
///
/// Binding lookups walk the scope chain innermost-out, then package scope,
/// then the import index. Tracking is flow-insensitive within a function:
/// a binding anywhere in a function covers the whole function body. That
/// can only make the classifier skip a call, never misattribute one.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// package clause name, e.g. "main"
    pub package: Option<String>,
    imports: ImportIndex,
    bindings: HashMap<(usize, String), Binding>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn imports(&self) -> &ImportIndex {
        &self.imports
    }

    pub fn add_import(&mut self, alias: Option<&str>, path: &str) {
        self.imports.add(alias, path);
    }

    /// Record a binding in `scope`
    pub fn bind(&mut self, scope: usize, name: &str, binding: Binding) {
        // a logger binding wins over an opaque one for the same name; the
        // reverse keeps the logger (re-binding a logger var to something
        // else in the same scope is rare and skipping is the safe side)
        let key = (scope, name.to_string());
        match (self.bindings.get(&key), &binding) {
            (Some(Binding::Logger(_)), Binding::Opaque) => {}
            _ => {
                self.bindings.insert(key, binding);
            }
        }
    }

    /// Binding for `name` exactly in `scope`
    pub fn binding(&self, scope: usize, name: &str) -> Option<&Binding> {
        self.bindings.get(&(scope, name.to_string()))
    }

    /// Resolve a selector operand as seen from a scope chain.
    ///
    /// `scopes` is ordered outermost-first and starts with FILE_SCOPE;
    /// resolution walks it innermost-out before consulting imports.
    pub fn resolve(&self, name: &str, scopes: &[usize]) -> Resolution<'_> {
        for scope in scopes.iter().rev() {
            match self.binding(*scope, name) {
                Some(Binding::Logger(ns)) => return Resolution::Namespace(ns),
                Some(Binding::Opaque) => return Resolution::Shadowed,
                None => {}
            }
        }

        match self.imports.resolve(name) {
            Some(path) => Resolution::Namespace(path),
            None => Resolution::Unknown,
        }
    }
}
