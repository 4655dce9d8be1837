//! Line-based style checking for Java source text
//!
//! The pipeline treats the style checker as a black box behind the
//! [`StyleAnalyzer`] trait and only consumes the issue count; the detailed
//! issue list is carried for callers that want it but nothing downstream
//! depends on it. Style checking works on raw text, never on the AST, so it
//! still runs when a unit fails to parse.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Upper bound on accepted input, matching the parser's guard
pub const MAX_SOURCE_BYTES: usize = 10_000_000;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("source code too large ({0} bytes), potential DoS risk")]
    SourceTooLarge(usize),

    #[error("style checker backend failed: {0}")]
    Backend(String),
}

/// One reported style violation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleIssue {
    pub line: usize,
    pub rule_id: String,
    pub message: String,
}

/// Result of one style check over a unit's text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleReport {
    pub issue_count: u32,
    pub issues: Vec<StyleIssue>,
}

/// External style checker contract: a deterministic issue count for raw
/// source text. A returned error is a tooling fault, not a style issue.
pub trait StyleAnalyzer: Send + Sync {
    fn check(&self, source: &str) -> Result<StyleReport, StyleError>;
}

/// Built-in checker with a small fixed rule set over physical lines
pub struct LintStyleAnalyzer {
    max_line_length: usize,
}

impl Default for LintStyleAnalyzer {
    fn default() -> Self {
        Self {
            max_line_length: 120,
        }
    }
}

impl LintStyleAnalyzer {
    pub fn new(max_line_length: usize) -> Self {
        Self { max_line_length }
    }
}

impl StyleAnalyzer for LintStyleAnalyzer {
    fn check(&self, source: &str) -> Result<StyleReport, StyleError> {
        if source.len() > MAX_SOURCE_BYTES {
            return Err(StyleError::SourceTooLarge(source.len()));
        }

        let mut issues = Vec::new();
        let mut in_block_comment = false;

        for (idx, line) in source.lines().enumerate() {
            let line_number = idx + 1;

            let char_count = line.chars().count();
            if char_count > self.max_line_length {
                issues.push(StyleIssue {
                    line: line_number,
                    rule_id: "STYLE001".to_string(),
                    message: format!(
                        "Line too long ({} > {} chars)",
                        char_count, self.max_line_length
                    ),
                });
            }

            if line.ends_with(' ') || line.ends_with('\t') {
                issues.push(StyleIssue {
                    line: line_number,
                    rule_id: "STYLE002".to_string(),
                    message: "Trailing whitespace".to_string(),
                });
            }

            if line
                .chars()
                .take_while(|c| c.is_whitespace())
                .any(|c| c == '\t')
            {
                issues.push(StyleIssue {
                    line: line_number,
                    rule_id: "STYLE003".to_string(),
                    message: "Tab character used for indentation".to_string(),
                });
            }

            let code = mask_non_code(line, &mut in_block_comment);
            let bytes = code.as_bytes();
            for (pos, &byte) in bytes.iter().enumerate() {
                if byte == b',' {
                    match bytes.get(pos + 1) {
                        Some(b' ') | Some(b'\t') | None => {}
                        Some(_) => issues.push(StyleIssue {
                            line: line_number,
                            rule_id: "STYLE004".to_string(),
                            message: "Missing whitespace after comma".to_string(),
                        }),
                    }
                }
            }
        }

        Ok(StyleReport {
            issue_count: issues.len() as u32,
            issues,
        })
    }
}

/// Blank out string/char literals and comments so the code-shape rules do not
/// fire inside them. Block-comment state carries across lines.
fn mask_non_code(line: &str, in_block_comment: &mut bool) -> String {
    let mut masked = String::with_capacity(line.len());
    let mut chars = line.chars().peekable();
    let mut in_string = false;
    let mut string_delim = '"';

    while let Some(ch) = chars.next() {
        if *in_block_comment {
            if ch == '*' && chars.peek() == Some(&'/') {
                chars.next();
                *in_block_comment = false;
                masked.push_str("  ");
            } else {
                masked.push(' ');
            }
            continue;
        }

        if in_string {
            if ch == '\\' {
                chars.next();
                masked.push_str("  ");
            } else if ch == string_delim {
                in_string = false;
                masked.push(' ');
            } else {
                masked.push(' ');
            }
            continue;
        }

        match ch {
            '/' if chars.peek() == Some(&'/') => {
                // Rest of the line is a comment
                break;
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                *in_block_comment = true;
                masked.push_str("  ");
            }
            '"' | '\'' => {
                in_string = true;
                string_delim = ch;
                masked.push(' ');
            }
            _ => masked.push(ch),
        }
    }

    masked
}
