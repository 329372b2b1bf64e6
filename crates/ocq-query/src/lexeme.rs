//! Lexemes produced by the tokenizer.

use std::fmt;

/// The lexical class of a lexeme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexemeKind {
    /// Punctuation: `( ) [ ] { } :` and the `+`/`-` modifiers.
    Control,
    /// One of the reserved words `AND`, `OR`, `NOT`.
    Keyword,
    /// Bare text.
    Text,
    /// Quoted text with the quotes stripped.
    QText,
    /// An integer or decimal literal.
    Number,
}

impl LexemeKind {
    /// Upper-case name used in diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Control => "CONTROL",
            Self::Keyword => "KEYWORD",
            Self::Text => "TEXT",
            Self::QText => "QTEXT",
            Self::Number => "NUMBER",
        }
    }
}

impl fmt::Display for LexemeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Integer literal.
    Int(i64),
    /// Decimal literal.
    Float(f64),
}

impl Number {
    /// Parses `text` as an integer, then as a finite decimal.
    ///
    /// Decimals are limited to digits, `.`, exponents and signs, so words such
    /// as `inf` or `nan` stay text. Integers too wide for `i64` also stay text
    /// rather than being rounded to a decimal.
    pub fn parse(text: &str) -> Option<Self> {
        if let Ok(n) = text.parse::<i64>() {
            return Some(Self::Int(n));
        }
        let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
        if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let numeric = text.bytes().any(|b| b.is_ascii_digit())
            && text
                .bytes()
                .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'));
        if !numeric {
            return None;
        }
        text.parse::<f64>()
            .ok()
            .filter(|x| x.is_finite())
            .map(Self::Float)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            // Keep a fractional part so the text re-lexes as a decimal.
            Self::Float(x) if x.fract() == 0.0 => write!(f, "{x:.1}"),
            Self::Float(x) => write!(f, "{x}"),
        }
    }
}

/// The payload of a lexeme.
#[derive(Debug, Clone, PartialEq)]
pub enum LexemeValue {
    /// Textual payload for every kind except `Number`.
    Text(String),
    /// Numeric payload.
    Number(Number),
}

impl fmt::Display for LexemeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A typed slice of the query.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexeme {
    /// Lexical class.
    pub kind: LexemeKind,
    /// Payload, with escapes and quotes removed.
    pub value: LexemeValue,
    /// Zero-based character index where the lexeme begins.
    pub position: usize,
}

impl Lexeme {
    /// Creates a lexeme with a textual payload.
    pub fn text(kind: LexemeKind, value: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            value: LexemeValue::Text(value.into()),
            position,
        }
    }

    /// Creates a `Number` lexeme.
    pub fn number(value: Number, position: usize) -> Self {
        Self {
            kind: LexemeKind::Number,
            value: LexemeValue::Number(value),
            position,
        }
    }

    /// Returns the textual payload, or `None` for numbers.
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            LexemeValue::Text(s) => Some(s),
            LexemeValue::Number(_) => None,
        }
    }

    /// Whether this is a `Control` lexeme holding exactly `ch`.
    pub fn is_control(&self, ch: char) -> bool {
        self.kind == LexemeKind::Control && self.as_str().is_some_and(|s| is_single(s, ch))
    }

    /// Whether this is the keyword `word`.
    pub fn is_keyword(&self, word: &str) -> bool {
        self.kind == LexemeKind::Keyword && self.as_str() == Some(word)
    }
}

/// Whether `s` consists of exactly the character `ch`.
fn is_single(s: &str, ch: char) -> bool {
    let mut chars = s.chars();
    chars.next() == Some(ch) && chars.next().is_none()
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.kind, self.value, self.position)
    }
}
