//! Rule Registry
//!
//! 统一规则管理架构
//!
//! Design goals:
//! 1. Single source of truth - every rule is defined here
//! 2. Two evaluation engines - message content rules, argument scanning
//! 3. Rule suppression - inline comment directives
//! 4. Documentation - the CLI `rules` command renders this registry

use std::collections::HashMap;
use once_cell::sync::Lazy;
use serde::{Serialize, Deserialize};

pub mod definitions;
pub mod suppression;

/// Rule identifiers, shared between the registry and the analyzer.
pub const MSG_UPPERCASE_START: &str = "MSG_UPPERCASE_START";
pub const MSG_NON_ENGLISH: &str = "MSG_NON_ENGLISH";
pub const MSG_SPECIAL_CHARS: &str = "MSG_SPECIAL_CHARS";
pub const SENSITIVE_LITERAL: &str = "SENSITIVE_LITERAL";
pub const SENSITIVE_VAR: &str = "SENSITIVE_VAR";

/// Finding severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// P0 - leaked credentials, must fix
    P0,
    /// P1 - style violation, should fix
    P1,
}

/// Rule category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// Conventions on the literal message text
    MessageStyle,
    /// Credential-looking data in logged arguments
    SensitiveData,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MessageStyle => "message style",
            Category::SensitiveData => "sensitive data",
        }
    }
}

/// Which engine evaluates a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Engine {
    /// Runs over the decoded message literal
    MessageRule,
    /// Runs over every argument of a matched call
    ArgumentScan,
}

/// Rule definition
#[derive(Debug, Clone)]
pub struct RuleDefinition {
    /// Unique rule identifier
    pub id: &'static str,
    /// Rule category
    pub category: Category,
    /// Severity of findings this rule produces
    pub severity: Severity,
    /// Short description
    pub description: &'static str,
    /// Why this is a problem
    pub rationale: &'static str,
    /// How to fix it
    pub fix_suggestion: &'static str,
    /// Evaluating engine
    pub engine: Engine,
    /// Enabled unless disabled via .logcheck.yml
    pub enabled_by_default: bool,
}

/// Rule registry
pub struct RuleRegistry {
    rules: HashMap<&'static str, RuleDefinition>,
    by_category: HashMap<Category, Vec<&'static str>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            rules: HashMap::new(),
            by_category: HashMap::new(),
        };

        for rule in definitions::all_rules() {
            registry.register(rule);
        }

        registry
    }

    fn register(&mut self, rule: RuleDefinition) {
        let id = rule.id;
        let category = rule.category;

        self.rules.insert(id, rule);
        self.by_category
            .entry(category)
            .or_default()
            .push(id);
    }

    pub fn get(&self, id: &str) -> Option<&RuleDefinition> {
        self.rules.get(id)
    }

    /// Severity for a rule id; unknown ids report as P1
    pub fn severity_of(&self, id: &str) -> Severity {
        self.rules.get(id).map(|r| r.severity).unwrap_or(Severity::P1)
    }

    pub fn all(&self) -> impl Iterator<Item = &RuleDefinition> {
        self.rules.values()
    }

    pub fn by_category(&self, category: Category) -> Vec<&RuleDefinition> {
        self.by_category
            .get(&category)
            .map(|ids| ids.iter().filter_map(|id| self.rules.get(*id)).collect())
            .unwrap_or_default()
    }

    pub fn message_rules(&self) -> Vec<&RuleDefinition> {
        self.rules.values()
            .filter(|r| r.engine == Engine::MessageRule)
            .collect()
    }

    pub fn argument_rules(&self) -> Vec<&RuleDefinition> {
        self.rules.values()
            .filter(|r| r.engine == Engine::ArgumentScan)
            .collect()
    }

    pub fn stats(&self) -> RegistryStats {
        let total = self.rules.len();
        let p0_count = self.rules.values().filter(|r| r.severity == Severity::P0).count();
        let p1_count = self.rules.values().filter(|r| r.severity == Severity::P1).count();

        RegistryStats {
            total,
            p0_count,
            p1_count,
            message_count: self.message_rules().len(),
            argument_count: self.argument_rules().len(),
        }
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry statistics
#[derive(Debug, Serialize)]
pub struct RegistryStats {
    pub total: usize,
    pub p0_count: usize,
    pub p1_count: usize,
    pub message_count: usize,
    pub argument_count: usize,
}

/// Global rule registry (lazy init)
pub static REGISTRY: Lazy<RuleRegistry> = Lazy::new(RuleRegistry::new);

pub fn registry() -> &'static RuleRegistry {
    &REGISTRY
}
