//! Rule definitions
//!
//! All rules are defined here, one entry per enforced convention.

use super::{Category, Engine, RuleDefinition, Severity};
use super::{
    MSG_NON_ENGLISH, MSG_SPECIAL_CHARS, MSG_UPPERCASE_START, SENSITIVE_LITERAL, SENSITIVE_VAR,
};

/// All rule definitions
pub fn all_rules() -> Vec<RuleDefinition> {
    let mut rules = Vec::new();

    rules.extend(message_style_rules());
    rules.extend(sensitive_data_rules());

    rules
}

// ============================================================================
// Message style rules
// ============================================================================

fn message_style_rules() -> Vec<RuleDefinition> {
    vec![
        RuleDefinition {
            id: MSG_UPPERCASE_START,
            category: Category::MessageStyle,
            severity: Severity::P1,
            description: "the log message must begin with a lowercase letter",
            rationale: "log lines are grepped and aggregated; a uniform lowercase start keeps \
                        them sortable and composable with surrounding context",
            fix_suggestion: "lowercase the first letter: \"Starting server\" -> \"starting server\"",
            engine: Engine::MessageRule,
            enabled_by_default: true,
        },
        RuleDefinition {
            id: MSG_NON_ENGLISH,
            category: Category::MessageStyle,
            severity: Severity::P1,
            description: "the log message must be in English only",
            rationale: "mixed-language logs break downstream tooling and are unreadable for \
                        on-call engineers who do not share the author's language",
            fix_suggestion: "translate the message to plain English",
            engine: Engine::MessageRule,
            enabled_by_default: true,
        },
        RuleDefinition {
            id: MSG_SPECIAL_CHARS,
            category: Category::MessageStyle,
            severity: Severity::P1,
            description: "the log message must not contain special characters or emojis",
            rationale: "emoji, operator symbols and trailing punctuation render inconsistently \
                        in terminals and log aggregators",
            fix_suggestion: "drop the emoji/symbol, remove trailing or repeated punctuation",
            engine: Engine::MessageRule,
            enabled_by_default: true,
        },
    ]
}

// ============================================================================
// Sensitive data rules
// ============================================================================

fn sensitive_data_rules() -> Vec<RuleDefinition> {
    vec![
        RuleDefinition {
            id: SENSITIVE_LITERAL,
            category: Category::SensitiveData,
            severity: Severity::P0,
            description: "log message contains sensitive data",
            rationale: "a credential-looking word in a logged string literal usually means the \
                        surrounding code is about to print the credential itself",
            fix_suggestion: "remove the secret from the message; log an opaque identifier instead",
            engine: Engine::ArgumentScan,
            enabled_by_default: true,
        },
        RuleDefinition {
            id: SENSITIVE_VAR,
            category: Category::SensitiveData,
            severity: Severity::P0,
            description: "attempt to log sensitive variable",
            rationale: "passing a variable named password/token/api_key/secret to a logger leaks \
                        its value into plaintext log storage",
            fix_suggestion: "log a redacted form or a stable identifier, never the raw value",
            engine: Engine::ArgumentScan,
            enabled_by_default: true,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_have_unique_ids() {
        let rules = all_rules();
        let mut ids: Vec<&str> = rules.iter().map(|r| r.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), rules.len());
    }

    #[test]
    fn test_sensitive_rules_are_p0() {
        for rule in all_rules() {
            if rule.category == Category::SensitiveData {
                assert_eq!(rule.severity, Severity::P0, "rule {}", rule.id);
            }
        }
    }
}
