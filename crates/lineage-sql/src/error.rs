//! Error types for lineage-sql

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The result type for parse operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing SQL
#[derive(Debug, Error)]
pub enum Error {
    /// No grammar alternative matched, or trailing input remained.
    /// Carries the furthest-failure expectation set and location.
    #[error("{}", .0.message)]
    Syntax(Box<SyntaxError>),

    /// A structurally valid parse that violates an out-of-grammar
    /// constraint (reserved word used as alias, INSERT arity mismatch).
    #[error("{0}")]
    Validation(String),
}

impl Error {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Create a syntax error from its structured parts, computing the
    /// human-readable message from the expectation set
    pub fn syntax(expected: Vec<Expectation>, found: Option<String>, location: Location) -> Self {
        let message = build_message(&expected, found.as_deref());
        Error::Syntax(Box::new(SyntaxError {
            message,
            expected,
            found,
            location,
        }))
    }
}

/// Structured detail for a syntax error
#[derive(Debug, Clone, Serialize)]
pub struct SyntaxError {
    /// `Expected <expected> but <found> found.`
    pub message: String,
    /// Deduplicated descriptors recorded at the furthest failure position
    pub expected: Vec<Expectation>,
    /// The single input character at the failure position, or None at end of input
    pub found: Option<String>,
    /// Failure position (start/end, 1-based line/column)
    pub location: Location,
}

/// A position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// Character offset from the start of input
    pub offset: usize,
    /// Line number (1-based)
    pub line: usize,
    /// Column number (1-based)
    pub column: usize,
}

/// A half-open source range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    pub start: Position,
    pub end: Position,
}

/// One element of a character class expectation: a single character
/// or an inclusive range
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ClassPart {
    Single(char),
    Range(char, char),
}

/// What the parser expected at a failure position
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Expectation {
    /// A literal string, possibly matched case-insensitively
    Literal {
        text: String,
        #[serde(rename = "ignoreCase")]
        ignore_case: bool,
    },
    /// A character class such as `[A-Za-z_]`
    Class {
        parts: Vec<ClassPart>,
        inverted: bool,
    },
    /// Any character
    Any,
    /// End of input
    End,
    /// A named description
    Other { description: String },
}

impl Expectation {
    pub fn literal(text: impl Into<String>) -> Self {
        Expectation::Literal {
            text: text.into(),
            ignore_case: false,
        }
    }

    pub fn literal_ci(text: impl Into<String>) -> Self {
        Expectation::Literal {
            text: text.into(),
            ignore_case: true,
        }
    }

    pub fn class(parts: Vec<ClassPart>, inverted: bool) -> Self {
        Expectation::Class { parts, inverted }
    }

    /// Render this expectation the way PEG.js describes it in error
    /// messages: literals quoted and escaped, classes in `[...]` form
    pub fn describe(&self) -> String {
        match self {
            Expectation::Literal { text, .. } => format!("\"{}\"", literal_escape(text)),
            Expectation::Class { parts, inverted } => {
                let mut out = String::from("[");
                if *inverted {
                    out.push('^');
                }
                for part in parts {
                    match part {
                        ClassPart::Single(c) => out.push_str(&class_escape(*c)),
                        ClassPart::Range(lo, hi) => {
                            out.push_str(&class_escape(*lo));
                            out.push('-');
                            out.push_str(&class_escape(*hi));
                        }
                    }
                }
                out.push(']');
                out
            }
            Expectation::Any => "any character".to_string(),
            Expectation::End => "end of input".to_string(),
            Expectation::Other { description } => description.clone(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

fn hex_upper(c: char) -> String {
    format!("{:X}", c as u32)
}

/// Escape a character for inclusion inside a quoted literal description
fn escape_common(c: char, out: &mut String) {
    match c {
        '\0' => out.push_str("\\0"),
        '\t' => out.push_str("\\t"),
        '\n' => out.push_str("\\n"),
        '\r' => out.push_str("\\r"),
        '\x01'..='\x0F' => {
            out.push_str("\\x0");
            out.push_str(&hex_upper(c));
        }
        '\x10'..='\x1F' | '\x7F'..='\u{9F}' => {
            out.push_str("\\x");
            out.push_str(&hex_upper(c));
        }
        _ => out.push(c),
    }
}

pub(crate) fn literal_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => escape_common(c, &mut out),
        }
    }
    out
}

fn class_escape(c: char) -> String {
    let mut out = String::new();
    match c {
        '\\' => out.push_str("\\\\"),
        ']' => out.push_str("\\]"),
        '^' => out.push_str("\\^"),
        '-' => out.push_str("\\-"),
        _ => escape_common(c, &mut out),
    }
    out
}

/// Build the fixed-template diagnostic `Expected <x> but <y> found.`
/// with deduplicated, sorted, natural-language joined descriptors.
pub(crate) fn build_message(expected: &[Expectation], found: Option<&str>) -> String {
    let mut descriptions: Vec<String> = expected.iter().map(Expectation::describe).collect();
    descriptions.sort();
    descriptions.dedup();

    let expected_text = match descriptions.len() {
        0 => String::new(),
        1 => descriptions[0].clone(),
        2 => format!("{} or {}", descriptions[0], descriptions[1]),
        n => format!(
            "{}, or {}",
            descriptions[..n - 1].join(", "),
            descriptions[n - 1]
        ),
    };

    let found_text = match found {
        Some(s) if !s.is_empty() => format!("\"{}\"", literal_escape(s)),
        _ => "end of input".to_string(),
    };

    format!("Expected {} but {} found.", expected_text, found_text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describes_literal_with_escapes() {
        let e = Expectation::literal("a\"b\\c\n");
        assert_eq!(e.describe(), "\"a\\\"b\\\\c\\n\"");
    }

    #[test]
    fn describes_class_with_ranges() {
        let e = Expectation::class(
            vec![
                ClassPart::Range('A', 'Z'),
                ClassPart::Range('a', 'z'),
                ClassPart::Single('_'),
            ],
            false,
        );
        assert_eq!(e.describe(), "[A-Za-z_]");
    }

    #[test]
    fn describes_inverted_class() {
        let e = Expectation::class(vec![ClassPart::Single('\''), ClassPart::Single('\\')], true);
        assert_eq!(e.describe(), "[^'\\\\]");
    }

    #[test]
    fn message_single_expectation() {
        let msg = build_message(&[Expectation::End], Some(";"));
        assert_eq!(msg, "Expected end of input but \";\" found.");
    }

    #[test]
    fn message_two_expectations_sorted() {
        let msg = build_message(
            &[Expectation::literal("b"), Expectation::literal("a")],
            None,
        );
        assert_eq!(msg, "Expected \"a\" or \"b\" but end of input found.");
    }

    #[test]
    fn message_three_expectations_oxford_join() {
        let msg = build_message(
            &[
                Expectation::literal("c"),
                Expectation::literal("a"),
                Expectation::literal("b"),
            ],
            Some("x"),
        );
        assert_eq!(msg, "Expected \"a\", \"b\", or \"c\" but \"x\" found.");
    }

    #[test]
    fn message_dedupes_descriptors() {
        let msg = build_message(
            &[Expectation::literal("a"), Expectation::literal("a")],
            None,
        );
        assert_eq!(msg, "Expected \"a\" but end of input found.");
    }

    #[test]
    fn control_chars_use_hex_escapes() {
        let e = Expectation::literal("\x01\x10");
        assert_eq!(e.describe(), "\"\\x01\\x10\"");
    }
}
