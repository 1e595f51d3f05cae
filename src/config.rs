// ============================================================================
// Lint configuration - immutable tables, built once per scan
// ============================================================================
//
// Two layers:
// - LintConfig: the optional .logcheck.yml file at the scan root
// - LintTables: compiled-in defaults overlaid with the config, shared
//   read-only across worker threads for the whole scan
//
// ============================================================================

use std::collections::{HashMap, HashSet};
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

/// Config file name, looked up at the scan root
pub const CONFIG_FILE: &str = ".logcheck.yml";

/// Known logging namespaces
pub const SLOG_PKG: &str = "log/slog";
pub const LOG_PKG: &str = "log";
pub const ZAP_PKG: &str = "go.uber.org/zap";

/// User-facing configuration (.logcheck.yml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Additional sensitive keywords, matched like the built-in set
    pub extra_keywords: Vec<String>,
    /// Additional logging package paths, using the standard method table
    pub extra_packages: Vec<String>,
    /// Rule ids to disable for the whole scan
    pub disabled_rules: Vec<String>,
}

impl LintConfig {
    /// Load .logcheck.yml from `dir`, falling back to defaults when absent
    pub fn load(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }
}

/// Immutable lookup tables driving one scan
///
/// Constructed once, then only read. Safe to share across rayon workers
/// without synchronization.
#[derive(Debug)]
pub struct LintTables {
    /// namespace -> method name -> message argument index
    signatures: HashMap<String, HashMap<&'static str, usize>>,
    /// lowercase sensitive keywords
    keywords: Vec<String>,
    /// namespace -> constructor functions returning a logger of that namespace
    logger_ctors: HashMap<String, HashSet<&'static str>>,
    /// namespace -> type names that are loggers of that namespace
    logger_types: HashMap<String, HashSet<&'static str>>,
    /// methods on a logger value that return another logger of the same namespace
    chain_methods: HashSet<&'static str>,
    /// disabled rule ids
    disabled: HashSet<String>,
}

/// Message-bearing methods shared by all registered namespaces.
/// Plain methods carry the message at index 0, the context-taking
/// variants at index 1.
const PLAIN_METHODS: [&str; 5] = ["Info", "Error", "Debug", "Warn", "Fatal"];
const CONTEXT_METHODS: [&str; 4] = ["InfoContext", "ErrorContext", "DebugContext", "WarnContext"];

const SLOG_CTORS: [&str; 3] = ["New", "Default", "With"];
const LOG_CTORS: [&str; 2] = ["New", "Default"];
const ZAP_CTORS: [&str; 8] = [
    "New",
    "NewProduction",
    "NewDevelopment",
    "NewExample",
    "NewNop",
    "Must",
    "L",
    "S",
];

const CHAIN_METHODS: [&str; 5] = ["With", "WithGroup", "Named", "Sugar", "Desugar"];

impl LintTables {
    pub fn new(config: &LintConfig) -> Self {
        let mut signatures = HashMap::new();
        let mut logger_ctors = HashMap::new();
        let mut logger_types: HashMap<String, HashSet<&'static str>> = HashMap::new();

        let method_table: HashMap<&'static str, usize> = PLAIN_METHODS
            .iter()
            .map(|m| (*m, 0))
            .chain(CONTEXT_METHODS.iter().map(|m| (*m, 1)))
            .collect();

        let mut register = |ns: &str, ctors: &[&'static str], types: &[&'static str]| {
            signatures.insert(ns.to_string(), method_table.clone());
            logger_ctors.insert(ns.to_string(), ctors.iter().copied().collect());
            logger_types.insert(ns.to_string(), types.iter().copied().collect());
        };

        register(SLOG_PKG, &SLOG_CTORS, &["Logger"]);
        register(LOG_PKG, &LOG_CTORS, &["Logger"]);
        register(ZAP_PKG, &ZAP_CTORS, &["Logger", "SugaredLogger"]);
        for pkg in &config.extra_packages {
            // third-party packages get the standard tables; good enough for
            // the zerolog/logrus style APIs this is meant for
            register(pkg, &SLOG_CTORS, &["Logger"]);
        }

        let mut keywords: Vec<String> = ["password", "token", "api_key", "secret"]
            .iter()
            .map(|k| k.to_string())
            .collect();
        keywords.extend(config.extra_keywords.iter().map(|k| k.to_lowercase()));

        Self {
            signatures,
            keywords,
            logger_ctors,
            logger_types,
            chain_methods: CHAIN_METHODS.iter().copied().collect(),
            disabled: config.disabled_rules.iter().cloned().collect(),
        }
    }

    /// Message-argument index for (namespace, method), if registered
    pub fn message_index(&self, namespace: &str, method: &str) -> Option<usize> {
        self.signatures.get(namespace)?.get(method).copied()
    }

    /// Is `namespace` a registered logging package?
    pub fn is_logging_namespace(&self, namespace: &str) -> bool {
        self.signatures.contains_key(namespace)
    }

    /// Does calling `func_name` from `namespace` produce a logger value?
    pub fn is_logger_ctor(&self, namespace: &str, func_name: &str) -> bool {
        self.logger_ctors
            .get(namespace)
            .map(|s| s.contains(func_name))
            .unwrap_or(false)
    }

    /// Is (namespace, type_name) a logger type?
    pub fn is_logger_type(&self, namespace: &str, type_name: &str) -> bool {
        self.logger_types
            .get(namespace)
            .map(|s| s.contains(type_name))
            .unwrap_or(false)
    }

    /// Does `method` on a logger return another logger of the same namespace?
    pub fn is_chain_method(&self, method: &str) -> bool {
        self.chain_methods.contains(method)
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        !self.disabled.contains(rule_id)
    }
}

impl Default for LintTables {
    fn default() -> Self {
        Self::new(&LintConfig::default())
    }
}

/// Shared default tables for callers that have no config file
pub static DEFAULT_TABLES: Lazy<LintTables> = Lazy::new(LintTables::default);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_signature_table() {
        let tables = LintTables::default();

        assert_eq!(tables.message_index(SLOG_PKG, "Info"), Some(0));
        assert_eq!(tables.message_index(SLOG_PKG, "InfoContext"), Some(1));
        assert_eq!(tables.message_index(ZAP_PKG, "Fatal"), Some(0));
        assert_eq!(tables.message_index(SLOG_PKG, "Printf"), None);
        assert_eq!(tables.message_index("fmt", "Println"), None);
    }

    #[test]
    fn test_default_keywords() {
        let tables = LintTables::default();
        assert_eq!(tables.keywords().join(","), "password,token,api_key,secret");
    }

    #[test]
    fn test_yaml_overlay() {
        let yaml = r#"
extra_keywords: [Passwd, credential]
extra_packages: ["github.com/rs/zerolog"]
disabled_rules: [MSG_SPECIAL_CHARS]
"#;
        let config: LintConfig = serde_yaml::from_str(yaml).unwrap();
        let tables = LintTables::new(&config);

        assert!(tables.keywords().contains(&"passwd".to_string()));
        assert!(tables.is_logging_namespace("github.com/rs/zerolog"));
        assert_eq!(tables.message_index("github.com/rs/zerolog", "Info"), Some(0));
        assert!(!tables.is_rule_enabled("MSG_SPECIAL_CHARS"));
        assert!(tables.is_rule_enabled("MSG_NON_ENGLISH"));
    }

    #[test]
    fn test_unknown_config_key_rejected() {
        let yaml = "extra_keyword: [oops]\n";
        assert!(serde_yaml::from_str::<LintConfig>(yaml).is_err());
    }

    #[test]
    fn test_logger_ctor_lookup() {
        let tables = LintTables::default();
        assert!(tables.is_logger_ctor(ZAP_PKG, "NewProduction"));
        assert!(tables.is_logger_ctor(SLOG_PKG, "Default"));
        assert!(!tables.is_logger_ctor(SLOG_PKG, "NewProduction"));
        assert!(tables.is_chain_method("With"));
    }
}
