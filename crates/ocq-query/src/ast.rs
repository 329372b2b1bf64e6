//! Query abstract syntax tree.
//!
//! Represents parsed queries before translation to a backend query. The
//! [`fmt::Display`] form is a query string that parses back to an equal tree.

use std::fmt;

use crate::{lexeme::Number, visit::Visitor};

/// Binding strength of the loosest node kind.
const PREC_PHRASE: u16 = 400;
/// Binding strength of `OR`.
const PREC_OR: u16 = 500;
/// Binding strength of `AND`.
const PREC_AND: u16 = 600;
/// Binding strength of `NOT`.
const PREC_NOT: u16 = 800;
/// Binding strength of `+` and `-`.
const PREC_MODIFIER: u16 = 900;
/// Binding strength of field queries.
const PREC_LEAF: u16 = 1000;

/// Words that must be quoted to be read back as plain values.
const RESERVED: [&str; 4] = ["AND", "OR", "NOT", "TO"];

/// A literal compared against a field.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Text, from a bare or quoted lexeme.
    Str(String),
    /// A numeric literal.
    Number(Number),
}

impl From<&str> for Literal {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Literal {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<i32> for Literal {
    fn from(n: i32) -> Self {
        Self::Number(Number::Int(n.into()))
    }
}

impl From<i64> for Literal {
    fn from(n: i64) -> Self {
        Self::Number(Number::Int(n))
    }
}

impl From<f64> for Literal {
    fn from(x: f64) -> Self {
        Self::Number(Number::Float(x))
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write_str_literal(f, s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Equality match, optionally scoped to a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    /// Field name, or `None` for a global match.
    pub name: Option<String>,
    /// The value to match.
    pub value: Literal,
}

/// Pattern match using `*` and `?`, optionally scoped to a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Wildcard {
    /// Field name, or `None` for a global match.
    pub name: Option<String>,
    /// Pattern containing at least one `*` or `?`.
    pub pattern: String,
}

/// Value range, optionally scoped to a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Range {
    /// Field name, or `None` for a global match.
    pub name: Option<String>,
    /// Lower bound.
    pub lo: Literal,
    /// Upper bound.
    pub hi: Literal,
    /// `true` for `[lo TO hi]`, `false` for `{lo TO hi}`.
    pub inclusive: bool,
}

/// A parsed query term.
#[derive(Debug, Clone, PartialEq)]
pub enum Term {
    /// Juxtaposed terms, an implicit conjunction.
    Phrase(Vec<Self>),
    /// Both sides must match.
    And(Box<Self>, Box<Self>),
    /// Either side must match.
    Or(Box<Self>, Box<Self>),
    /// The term must not match.
    Not(Box<Self>),
    /// Required field query, from a leading `+`.
    Include(Box<Self>),
    /// Forbidden field query, from a leading `-`.
    Exclude(Box<Self>),
    /// Equality match.
    Value(Value),
    /// Pattern match.
    Wildcard(Wildcard),
    /// Range match.
    Range(Range),
}

impl Term {
    /// Creates a phrase of juxtaposed terms.
    pub fn phrase(terms: Vec<Self>) -> Self {
        Self::Phrase(terms)
    }

    /// Creates a conjunction.
    pub fn and(left: Self, right: Self) -> Self {
        Self::And(Box::new(left), Box::new(right))
    }

    /// Creates a disjunction.
    pub fn or(left: Self, right: Self) -> Self {
        Self::Or(Box::new(left), Box::new(right))
    }

    /// Creates a negation.
    pub fn not(term: Self) -> Self {
        Self::Not(Box::new(term))
    }

    /// Marks a field query as required.
    pub fn include(term: Self) -> Self {
        Self::Include(Box::new(term))
    }

    /// Marks a field query as forbidden.
    pub fn exclude(term: Self) -> Self {
        Self::Exclude(Box::new(term))
    }

    /// Creates an equality match.
    pub fn value(value: impl Into<Literal>, name: Option<&str>) -> Self {
        Self::Value(Value {
            name: name.map(str::to_string),
            value: value.into(),
        })
    }

    /// Creates a pattern match.
    pub fn wildcard(pattern: impl Into<String>, name: Option<&str>) -> Self {
        Self::Wildcard(Wildcard {
            name: name.map(str::to_string),
            pattern: pattern.into(),
        })
    }

    /// Creates a range match.
    pub fn range(
        lo: impl Into<Literal>,
        hi: impl Into<Literal>,
        inclusive: bool,
        name: Option<&str>,
    ) -> Self {
        Self::Range(Range {
            name: name.map(str::to_string),
            lo: lo.into(),
            hi: hi.into(),
            inclusive,
        })
    }

    /// Binding strength used when stringifying; higher binds tighter.
    pub fn precedence(&self) -> u16 {
        match self {
            Self::Phrase(_) => PREC_PHRASE,
            Self::Or(..) => PREC_OR,
            Self::And(..) => PREC_AND,
            Self::Not(_) => PREC_NOT,
            Self::Include(_) | Self::Exclude(_) => PREC_MODIFIER,
            Self::Value(_) | Self::Wildcard(_) | Self::Range(_) => PREC_LEAF,
        }
    }

    /// Whether this is a field query (`Value`, `Wildcard` or `Range`).
    pub fn is_field_query(&self) -> bool {
        matches!(self, Self::Value(_) | Self::Wildcard(_) | Self::Range(_))
    }

    /// Walks the tree in post-order, handing each node its children's results.
    pub fn accept<V: Visitor + ?Sized>(&self, visitor: &mut V) -> Option<V::Output> {
        match self {
            Self::Phrase(terms) => {
                let results: Vec<_> = terms.iter().map(|t| t.accept(visitor)).collect();
                visitor.visit_phrase(results)
            }
            Self::And(left, right) => {
                let left = left.accept(visitor);
                let right = right.accept(visitor);
                visitor.visit_and(left, right)
            }
            Self::Or(left, right) => {
                let left = left.accept(visitor);
                let right = right.accept(visitor);
                visitor.visit_or(left, right)
            }
            Self::Not(term) => {
                let result = term.accept(visitor);
                visitor.visit_not(result)
            }
            Self::Include(term) => {
                let result = term.accept(visitor);
                visitor.visit_include(result)
            }
            Self::Exclude(term) => {
                let result = term.accept(visitor);
                visitor.visit_exclude(result)
            }
            Self::Value(value) => visitor.visit_value(value),
            Self::Wildcard(wildcard) => visitor.visit_wildcard(wildcard),
            Self::Range(range) => visitor.visit_range(range),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Phrase(terms) => {
                if terms.is_empty() {
                    return f.write_str("()");
                }
                for (i, term) in terms.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write_operand(f, term, PREC_PHRASE + 1)?;
                }
                Ok(())
            }
            // The left operand of AND/OR is read as a unary term and the right
            // operand as an OR production.
            Self::And(left, right) => {
                write_operand(f, left, PREC_NOT)?;
                f.write_str(" AND ")?;
                write_operand(f, right, PREC_OR)
            }
            Self::Or(left, right) => {
                write_operand(f, left, PREC_NOT)?;
                f.write_str(" OR ")?;
                write_operand(f, right, PREC_OR)
            }
            Self::Not(term) => {
                f.write_str("NOT ")?;
                write_operand(f, term, PREC_NOT)
            }
            Self::Include(term) => write_modifier(f, '+', term),
            Self::Exclude(term) => write_modifier(f, '-', term),
            Self::Value(value) => {
                write_field_prefix(f, value.name.as_deref())?;
                write!(f, "{}", value.value)
            }
            Self::Wildcard(wildcard) => {
                write_field_prefix(f, wildcard.name.as_deref())?;
                write_pattern(f, &wildcard.pattern)
            }
            Self::Range(range) => {
                write_field_prefix(f, range.name.as_deref())?;
                let (open, close) = if range.inclusive {
                    ('[', ']')
                } else {
                    ('{', '}')
                };
                write!(f, "{open}{} TO {}{close}", range.lo, range.hi)
            }
        }
    }
}

/// Writes `child`, parenthesised when it binds looser than `min`.
fn write_operand(f: &mut fmt::Formatter<'_>, child: &Term, min: u16) -> fmt::Result {
    if child.precedence() < min {
        write!(f, "({child})")
    } else {
        write!(f, "{child}")
    }
}

/// Writes a modifier followed by its field query.
fn write_modifier(f: &mut fmt::Formatter<'_>, sign: char, child: &Term) -> fmt::Result {
    write!(f, "{sign}")?;
    // A bare number would otherwise re-lex as a signed number.
    if let Term::Value(Value {
        name: None,
        value: Literal::Number(_),
    }) = child
    {
        f.write_str(" ")?;
    }
    write_operand(f, child, PREC_MODIFIER)
}

/// Writes `name:` when a field name is present.
fn write_field_prefix(f: &mut fmt::Formatter<'_>, name: Option<&str>) -> fmt::Result {
    match name {
        Some(name) => {
            write_str_literal(f, name)?;
            f.write_str(":")
        }
        None => Ok(()),
    }
}

/// Whether `ch` ends or alters a bare-text lexeme.
fn is_special(ch: char) -> bool {
    ch.is_whitespace() || matches!(ch, '(' | ')' | '[' | ']' | '{' | '}' | ':' | '"' | '\'' | '\\')
}

/// Whether `s` would tokenize back to a single `Text` lexeme equal to itself.
fn is_bare_text(s: &str) -> bool {
    !s.is_empty()
        && !s.starts_with(['+', '-'])
        && !s.chars().any(|c| is_special(c) || c == '*' || c == '?')
        && !RESERVED.contains(&s)
        && Number::parse(s).is_none()
}

/// Writes text bare when it reads back unchanged, otherwise double-quoted.
fn write_str_literal(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    if is_bare_text(s) {
        return f.write_str(s);
    }
    f.write_str("\"")?;
    for ch in s.chars() {
        if matches!(ch, '"' | '\\') {
            f.write_str("\\")?;
        }
        write!(f, "{ch}")?;
    }
    f.write_str("\"")
}

/// Writes a wildcard pattern bare, escaping characters that would split it.
fn write_pattern(f: &mut fmt::Formatter<'_>, pattern: &str) -> fmt::Result {
    for (i, ch) in pattern.chars().enumerate() {
        if is_special(ch) || (i == 0 && matches!(ch, '+' | '-')) {
            f.write_str("\\")?;
        }
        write!(f, "{ch}")?;
    }
    Ok(())
}
