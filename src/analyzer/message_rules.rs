//! Message content rules
//!
//! Three independent checks over the decoded message literal. They never
//! short-circuit each other: one message can violate all three at once,
//! and every violation becomes its own finding.

use crate::config::LintTables;
use crate::rules::{MSG_NON_ENGLISH, MSG_SPECIAL_CHARS, MSG_UPPERCASE_START};

/// ASCII characters in the Unicode symbol categories (Sm/Sc/Sk).
const ASCII_SYMBOLS: [char; 9] = ['$', '+', '<', '=', '>', '^', '`', '|', '~'];

/// Rule ids violated by `msg`, in evaluation order.
pub fn violations(msg: &str, tables: &LintTables) -> Vec<&'static str> {
    let mut out = Vec::new();

    if tables.is_rule_enabled(MSG_UPPERCASE_START) && !is_lowercase_start(msg) {
        out.push(MSG_UPPERCASE_START);
    }
    if tables.is_rule_enabled(MSG_NON_ENGLISH) && !is_english(msg) {
        out.push(MSG_NON_ENGLISH);
    }
    if tables.is_rule_enabled(MSG_SPECIAL_CHARS) && has_forbidden_chars(msg) {
        out.push(MSG_SPECIAL_CHARS);
    }

    out
}

/// The first letter of the message, if any, must be lowercase.
/// Messages with no letters at all (empty, digit-prefixed) pass.
pub(crate) fn is_lowercase_start(msg: &str) -> bool {
    for c in msg.chars() {
        if c.is_alphabetic() {
            return !c.is_uppercase();
        }
    }
    true
}

/// No letter outside the ASCII range. Mixed and fully non-English
/// messages both fail; digits and punctuation are fine.
pub(crate) fn is_english(msg: &str) -> bool {
    !msg.chars().any(|c| !c.is_ascii() && c.is_alphabetic())
}

/// Symbols, emoji, `!`/`?`, and trailing or doubled periods.
///
/// A single mid-string period stays legal so version strings
/// ("v1.2.3-beta"), addresses ("127.0.0.1") and unit names
/// ("failed.service") pass, while "wait..." and "failed.service." fail.
pub(crate) fn has_forbidden_chars(msg: &str) -> bool {
    let chars: Vec<char> = msg.chars().collect();
    for (i, &c) in chars.iter().enumerate() {
        if is_symbol_char(c) || c == '!' || c == '?' {
            return true;
        }
        if c == '.' {
            if i == chars.len() - 1 {
                return true;
            }
            if chars[i + 1] == '.' {
                return true;
            }
        }
    }
    false
}

/// Symbol classification without Unicode tables: the ASCII symbol set is
/// enumerated exactly; beyond ASCII, anything that is not a letter, digit
/// or whitespace counts as a symbol (emoji, math operators, arrows).
/// Non-ASCII letters are the English-only rule's concern, not this one's.
fn is_symbol_char(c: char) -> bool {
    if c.is_ascii() {
        ASCII_SYMBOLS.contains(&c)
    } else {
        !c.is_alphabetic() && !c.is_numeric() && !c.is_whitespace()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_is_lowercase_start() {
        assert!(is_lowercase_start(""));
        assert!(is_lowercase_start("123 error"));
        assert!(is_lowercase_start("starting server"));
        assert!(!is_lowercase_start("Starting server"));
        // the first letter decides, wherever it sits
        assert!(!is_lowercase_start("42 Errors found"));
        assert!(!is_lowercase_start("Ошибка"));
    }

    #[test]
    fn test_is_english() {
        assert!(is_english("database connected"));
        assert!(is_english("port 8080"));
        assert!(!is_english("ошибка"));
        assert!(!is_english("error ошибка"));
    }

    #[test]
    fn test_has_forbidden_chars() {
        assert!(!has_forbidden_chars("server started"));
        assert!(has_forbidden_chars("failed!!!"));
        assert!(has_forbidden_chars("failed?"));
        assert!(has_forbidden_chars("wait..."));
        assert!(has_forbidden_chars("fire 🔥"));
        assert!(has_forbidden_chars("math: a + b"));
        assert!(!has_forbidden_chars(""));
        assert!(!has_forbidden_chars("server on 127.0.0.1"));
        assert!(!has_forbidden_chars("version 1.2.3-beta"));
        assert!(!has_forbidden_chars("path/to/file.go"));
        assert!(!has_forbidden_chars("failed.service"));
        assert!(!has_forbidden_chars("user_id: 123"));
        assert!(has_forbidden_chars("failed.service."));
        assert!(has_forbidden_chars("failed.service........."));
    }

    #[test]
    fn test_violations_accumulate() {
        let tables = crate::config::LintTables::default();
        // uppercase start and a symbol at once
        let v = violations("Fire 🔥", &tables);
        assert_eq!(v, vec![MSG_UPPERCASE_START, MSG_SPECIAL_CHARS]);
    }

    #[test]
    fn test_violations_respect_disabled_rules() {
        let config = crate::config::LintConfig {
            disabled_rules: vec![MSG_SPECIAL_CHARS.to_string()],
            ..Default::default()
        };
        let tables = crate::config::LintTables::new(&config);
        assert!(violations("wait...", &tables).is_empty());
    }

    proptest! {
        /// A message with no alphabetic characters can never trip the
        /// lowercase or English rules.
        #[test]
        fn prop_letterless_messages_pass(msg in "[0-9 _./:-]{0,40}") {
            prop_assert!(is_lowercase_start(&msg));
            prop_assert!(is_english(&msg));
        }

        /// Plain lowercase ASCII text never trips any content rule.
        #[test]
        fn prop_plain_ascii_passes(msg in "[a-z][a-z0-9 ]{0,30}") {
            let tables = crate::config::LintTables::default();
            prop_assert!(violations(&msg, &tables).is_empty());
        }
    }
}
