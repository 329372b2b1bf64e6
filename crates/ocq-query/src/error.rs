//! Error types for tokenizing and parsing queries.
//!
//! Both stages report faults through a single [`QuerySyntaxError`] carrying the
//! zero-based character position of the fault, so callers can underline the
//! offending part of the query.

use thiserror::Error;

/// The family a syntax error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// A `(`, `[` or `{` without its partner, or a stray `)`.
    UnmatchedBracket,
    /// End of input reached inside a quoted run.
    UnterminatedQuote,
    /// Nothing parseable after `NOT`, `AND`, `OR`, `+` or `-`.
    MissingOperand,
    /// An operand of the wrong shape, e.g. a group after `+`.
    WrongOperand,
    /// A value range missing a bound, the `TO` keyword or its closing bracket.
    MalformedRange,
    /// A lexeme that does not fit the grammar where it appears.
    UnexpectedLexeme,
    /// A backslash with no character after it.
    DanglingEscape,
}

/// Syntax error raised by the tokenizer or the parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at position {position}")]
pub struct QuerySyntaxError {
    /// Which family of fault this is.
    pub kind: SyntaxErrorKind,
    /// Human-readable description naming the missing or unexpected construct.
    pub message: String,
    /// Zero-based character index into the query.
    pub position: usize,
    /// The query that failed.
    pub query: String,
}

impl QuerySyntaxError {
    /// Creates a new syntax error.
    pub fn new(
        kind: SyntaxErrorKind,
        message: impl Into<String>,
        position: usize,
        query: &str,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            position,
            query: query.to_string(),
        }
    }

    /// Formats the error with a caret under the offending character.
    pub fn format_with_context(&self) -> String {
        let clamped = self.position.min(self.query.chars().count());
        let mut result = String::new();
        result.push_str(&format!("query syntax error: {}\n", self.message));
        result.push_str(&format!("  {}\n", self.query));
        result.push_str(&format!("  {}^", " ".repeat(clamped)));
        result
    }

    /// Returns a suggestion for common errors.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self.kind {
            SyntaxErrorKind::UnterminatedQuote => {
                Some("Add the matching quote to close the quoted text")
            }
            SyntaxErrorKind::UnmatchedBracket if self.message.contains("[)]") => {
                Some("Every ( needs a matching ) later in the query")
            }
            SyntaxErrorKind::MalformedRange => {
                Some("Ranges look like field:[low TO high] or field:{low TO high}")
            }
            SyntaxErrorKind::WrongOperand => {
                Some("+ and - apply to a single value, e.g. +type:cat or -depth:[0 TO 10]")
            }
            SyntaxErrorKind::DanglingEscape => Some("Remove the trailing backslash"),
            _ => None,
        }
    }
}
