//! Rule suppression
//!
//! Findings can be suppressed inline:
//!
//! 1. Comment directives (any line)
//!    // logcheck-ignore: RULE_ID
//!    // logcheck-ignore: RULE_ID1, RULE_ID2
//!    // logcheck-ignore-next-line: RULE_ID
//!
//! 2. File-level directives
//!    // logcheck-ignore-file: RULE_ID
//!    // logcheck-ignore-file (suppresses every rule)
//!
//! 3. Go linter convention
//!    //nolint:logcheck (suppresses every rule on that line)

use std::collections::{HashMap, HashSet};
use once_cell::sync::Lazy;
use regex::Regex;

static SUPPRESS_COMMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    // matches: logcheck-ignore: RULE_ID, logcheck-ignore-next-line: RULE_ID,
    // logcheck-ignore-file: RULE_ID
    Regex::new(r"logcheck-ignore(?:-next-line|-file)?(?::\s*([A-Z_,\s]+))?").unwrap()
});

static NOLINT_REGEX: Lazy<Regex> = Lazy::new(|| {
    // matches: //nolint:logcheck and //nolint:foo,logcheck,bar
    Regex::new(r"//\s*nolint:([A-Za-z_,\s]+)").unwrap()
});

/// Suppression scope
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuppressionType {
    /// Same line
    Line,
    /// Line after the directive
    NextLine,
    /// Whole file
    File,
}

/// One parsed directive
#[derive(Debug, Clone)]
pub struct Suppression {
    pub suppression_type: SuppressionType,
    /// Suppressed rule ids (empty set means all rules)
    pub rule_ids: HashSet<String>,
    pub line: usize,
}

/// Per-file suppression context
#[derive(Debug, Default)]
pub struct SuppressionContext {
    /// line number -> rules suppressed on that line (empty set = all)
    line_suppressions: HashMap<usize, HashSet<String>>,
    /// lines where every rule is suppressed
    line_suppress_all: HashSet<usize>,
    /// file-level suppressed rules
    file_suppressions: HashSet<String>,
    /// suppress every rule in the file
    suppress_all_file: bool,
}

impl SuppressionContext {
    /// Parse suppression directives out of source text
    pub fn parse(code: &str) -> Self {
        let mut ctx = Self::default();

        for (line_num, line) in code.lines().enumerate() {
            let line_number = line_num + 1; // 1-based

            if let Some(suppression) = parse_comment_suppression(line, line_number) {
                match suppression.suppression_type {
                    SuppressionType::Line => {
                        ctx.add_line(line_number, suppression.rule_ids);
                    }
                    SuppressionType::NextLine => {
                        ctx.add_line(line_number + 1, suppression.rule_ids);
                    }
                    SuppressionType::File => {
                        if suppression.rule_ids.is_empty() {
                            ctx.suppress_all_file = true;
                        } else {
                            ctx.file_suppressions.extend(suppression.rule_ids);
                        }
                    }
                }
            }

            if parse_nolint(line) {
                ctx.line_suppress_all.insert(line_number);
            }
        }

        ctx
    }

    fn add_line(&mut self, line: usize, rule_ids: HashSet<String>) {
        if rule_ids.is_empty() {
            self.line_suppress_all.insert(line);
        } else {
            self.line_suppressions.entry(line).or_default().extend(rule_ids);
        }
    }

    /// Is `rule_id` suppressed on `line`?
    pub fn is_suppressed(&self, rule_id: &str, line: usize) -> bool {
        if self.suppress_all_file {
            return true;
        }

        if self.file_suppressions.contains(rule_id) {
            return true;
        }

        if self.line_suppress_all.contains(&line) {
            return true;
        }

        if let Some(suppressed_rules) = self.line_suppressions.get(&line) {
            if suppressed_rules.contains(rule_id) {
                return true;
            }
        }

        false
    }

    pub fn is_file_suppressed(&self) -> bool {
        self.suppress_all_file
    }
}

/// Parse a logcheck-ignore directive out of one line
fn parse_comment_suppression(line: &str, line_number: usize) -> Option<Suppression> {
    if !line.contains("logcheck-ignore") {
        return None;
    }

    let captures = SUPPRESS_COMMENT_REGEX.captures(line)?;
    let rule_ids: HashSet<String> = captures
        .get(1)
        .map(|m| {
            m.as_str()
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        })
        .unwrap_or_default();

    let suppression_type = if line.contains("ignore-file") {
        SuppressionType::File
    } else if line.contains("ignore-next-line") {
        SuppressionType::NextLine
    } else {
        SuppressionType::Line
    };

    Some(Suppression {
        suppression_type,
        rule_ids,
        line: line_number,
    })
}

/// Does the line carry a `//nolint:` directive naming logcheck?
fn parse_nolint(line: &str) -> bool {
    if !line.contains("nolint") {
        return false;
    }

    NOLINT_REGEX
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().split(',').any(|l| l.trim() == "logcheck"))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_suppression_line() {
        let code = r#"
func process() {
	slog.Info("Starting") // logcheck-ignore: MSG_UPPERCASE_START
}
"#;

        let ctx = SuppressionContext::parse(code);
        assert!(ctx.is_suppressed("MSG_UPPERCASE_START", 3));
        assert!(!ctx.is_suppressed("MSG_NON_ENGLISH", 3));
    }

    #[test]
    fn test_comment_suppression_next_line() {
        let code = r#"
func process() {
	// logcheck-ignore-next-line: SENSITIVE_VAR
	slog.Info("sending", token)
}
"#;

        let ctx = SuppressionContext::parse(code);
        assert!(ctx.is_suppressed("SENSITIVE_VAR", 4));
        assert!(!ctx.is_suppressed("SENSITIVE_VAR", 3));
    }

    #[test]
    fn test_file_suppression() {
        let code = r#"
// logcheck-ignore-file: MSG_SPECIAL_CHARS, MSG_NON_ENGLISH
package main
"#;

        let ctx = SuppressionContext::parse(code);
        assert!(ctx.is_suppressed("MSG_SPECIAL_CHARS", 10));
        assert!(ctx.is_suppressed("MSG_NON_ENGLISH", 100));
        assert!(!ctx.is_suppressed("SENSITIVE_VAR", 10));
    }

    #[test]
    fn test_file_suppression_all_rules() {
        let code = "// logcheck-ignore-file\npackage main\n";

        let ctx = SuppressionContext::parse(code);
        assert!(ctx.is_file_suppressed());
        assert!(ctx.is_suppressed("SENSITIVE_LITERAL", 42));
    }

    #[test]
    fn test_nolint_suppression() {
        let code = r#"
func process() {
	slog.Warn("failed!!!") //nolint:logcheck
	slog.Warn("wait...")   //nolint:gosec
}
"#;

        let ctx = SuppressionContext::parse(code);
        assert!(ctx.is_suppressed("MSG_SPECIAL_CHARS", 3));
        assert!(!ctx.is_suppressed("MSG_SPECIAL_CHARS", 4));
    }

    #[test]
    fn test_multiple_rules_suppression() {
        let code = r#"
slog.Info("Token") // logcheck-ignore: MSG_UPPERCASE_START, SENSITIVE_LITERAL
"#;

        let ctx = SuppressionContext::parse(code);
        assert!(ctx.is_suppressed("MSG_UPPERCASE_START", 2));
        assert!(ctx.is_suppressed("SENSITIVE_LITERAL", 2));
        assert!(!ctx.is_suppressed("MSG_NON_ENGLISH", 2));
    }
}
