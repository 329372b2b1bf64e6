//! Query parser.
//!
//! Parses a lexeme stream into a query AST using recursive descent. Nodes are
//! created through a [`Builder`].
//!
//! # Grammar
//!
//! ```text
//! list    → or*
//! or      → and ("OR" or)?
//! and     → unary ("AND" or)?
//! unary   → "NOT" unary | ("+" | "-") primary | primary
//! primary → (TEXT | QTEXT) ":" (value_or_range | "(" list ")")
//!         | value_or_range
//!         | "(" list ")"
//! value_or_range → TEXT | QTEXT | NUMBER
//!                | ("[" | "{") value "TO" value ("]" | "}")
//! ```
//!
//! The right operand of `AND` is an `or` production, so `a AND b OR c` reads
//! as `a AND (b OR c)`.
//!
//! A field name set by `name:` applies to the next primary only. When that
//! primary is a group, the name becomes the default for every unqualified
//! value inside it.

use tracing::debug;

use crate::{
    ast::{Literal, Term},
    builder::{Builder, DefaultBuilder},
    error::{QuerySyntaxError, SyntaxErrorKind},
    lexeme::{Lexeme, LexemeKind, LexemeValue},
    tokenizer::tokenize,
};

/// Recursive descent parser for query lexemes.
struct Parser<'a, B: ?Sized> {
    /// The original query, for error reporting.
    query: &'a str,
    /// Lexeme stream to parse.
    lexemes: Vec<Lexeme>,
    /// Current position in the lexeme stream.
    position: usize,
    /// Character length of the query, reported for errors at end of input.
    end: usize,
    /// Constructs the nodes.
    builder: &'a B,
}

impl<'a, B: Builder + ?Sized> Parser<'a, B> {
    /// Creates a new parser from a lexeme stream.
    fn new(query: &'a str, lexemes: Vec<Lexeme>, builder: &'a B) -> Self {
        Self {
            query,
            lexemes,
            position: 0,
            end: query.chars().count(),
            builder,
        }
    }

    /// Parses the whole lexeme stream.
    fn parse(mut self) -> Result<Option<Term>, QuerySyntaxError> {
        let term = self.parse_list(None)?;

        if let Some(lexeme) = self.peek() {
            return Err(self.unexpected(lexeme));
        }

        Ok(term)
    }

    /// Parses: list → or*
    ///
    /// Stops before a closing parenthesis or at the end of input.
    fn parse_list(&mut self, context: Option<&str>) -> Result<Option<Term>, QuerySyntaxError> {
        let mut terms = Vec::new();

        while !self.at_list_end() {
            if let Some(term) = self.parse_or(context)? {
                terms.push(term);
            }
        }

        Ok(match terms.len() {
            0 => None,
            1 => terms.pop(),
            _ => Some(self.builder.phrase(terms)),
        })
    }

    /// Parses: or → and ("OR" or)?
    fn parse_or(&mut self, context: Option<&str>) -> Result<Option<Term>, QuerySyntaxError> {
        let left = self.parse_and(context)?;

        let Some(op) = self.take_keyword("OR") else {
            return Ok(left);
        };
        let right = self.parse_operand(context, op, "OR")?;
        let left = left.ok_or_else(|| self.missing_before(op, "OR"))?;

        Ok(Some(self.builder.or(left, right)))
    }

    /// Parses: and → unary ("AND" or)?
    fn parse_and(&mut self, context: Option<&str>) -> Result<Option<Term>, QuerySyntaxError> {
        let left = self.parse_unary(context)?;

        let Some(op) = self.take_keyword("AND") else {
            return Ok(left);
        };
        let right = self.parse_operand(context, op, "AND")?;
        let left = left.ok_or_else(|| self.missing_before(op, "AND"))?;

        Ok(Some(self.builder.and(left, right)))
    }

    /// Parses the right operand of `AND` or `OR`, which must not be empty.
    fn parse_operand(
        &mut self,
        context: Option<&str>,
        op: usize,
        keyword: &str,
    ) -> Result<Term, QuerySyntaxError> {
        if self.at_list_end() {
            return Err(self.missing_after(op, keyword));
        }
        self.parse_or(context)?
            .ok_or_else(|| self.missing_after(op, keyword))
    }

    /// Parses: unary → "NOT" unary | ("+" | "-") primary | primary
    fn parse_unary(&mut self, context: Option<&str>) -> Result<Option<Term>, QuerySyntaxError> {
        if let Some(op) = self.take_keyword("NOT") {
            if self.at_list_end() {
                return Err(self.missing_after(op, "NOT"));
            }
            let term = self
                .parse_unary(context)?
                .ok_or_else(|| self.missing_after(op, "NOT"))?;
            return Ok(Some(self.builder.not(term)));
        }

        for sign in ['+', '-'] {
            if self.peek().is_some_and(|l| l.is_control(sign)) {
                self.advance();
                return self.parse_modified(context, sign).map(Some);
            }
        }

        self.parse_primary(context)
    }

    /// Parses the field query after a `+` or `-` modifier.
    fn parse_modified(
        &mut self,
        context: Option<&str>,
        sign: char,
    ) -> Result<Term, QuerySyntaxError> {
        let (at, query) = (self.current_position(), self.query);
        let wrong_operand = || {
            QuerySyntaxError::new(
                SyntaxErrorKind::WrongOperand,
                format!("Value or value range expected after [{sign}]"),
                at,
                query,
            )
        };

        let starts_field_query = self.peek().is_some_and(|l| match l.kind {
            LexemeKind::Text | LexemeKind::QText | LexemeKind::Number => true,
            LexemeKind::Control => l.is_control('[') || l.is_control('{'),
            LexemeKind::Keyword => false,
        });
        if !starts_field_query {
            return Err(wrong_operand());
        }

        match self.parse_primary(context)? {
            Some(term) if term.is_field_query() => Ok(if sign == '+' {
                self.builder.include(term)
            } else {
                self.builder.exclude(term)
            }),
            _ => Err(wrong_operand()),
        }
    }

    /// Parses: primary → name ":" target | value_or_range | "(" list ")"
    fn parse_primary(&mut self, context: Option<&str>) -> Result<Option<Term>, QuerySyntaxError> {
        let Some(lexeme) = self.peek().cloned() else {
            return Err(self.unexpected_end());
        };

        match lexeme.kind {
            LexemeKind::Text | LexemeKind::QText => {
                self.advance();
                if self.peek().is_some_and(|l| l.is_control(':')) {
                    self.advance();
                    let name = lexeme.as_str().unwrap_or_default();
                    return self.parse_field_target(name);
                }
                self.unpeek();
                self.parse_value_or_range(context).map(Some)
            }
            LexemeKind::Number => self.parse_value_or_range(context).map(Some),
            LexemeKind::Control if lexeme.is_control('(') => self.parse_group(context),
            LexemeKind::Control if lexeme.is_control('[') || lexeme.is_control('{') => {
                self.parse_range(context).map(Some)
            }
            _ => Err(self.unexpected(&lexeme)),
        }
    }

    /// Parses what follows `name:`, either a value, a range or a group.
    fn parse_field_target(&mut self, name: &str) -> Result<Option<Term>, QuerySyntaxError> {
        match self.peek() {
            Some(l) if l.is_control('(') => self.parse_group(Some(name)),
            Some(l)
                if matches!(
                    l.kind,
                    LexemeKind::Text | LexemeKind::QText | LexemeKind::Number
                ) || l.is_control('[')
                    || l.is_control('{') =>
            {
                self.parse_value_or_range(Some(name)).map(Some)
            }
            _ => Err(QuerySyntaxError::new(
                SyntaxErrorKind::MissingOperand,
                format!("Value or value range expected after [{name}:]"),
                self.current_position(),
                self.query,
            )),
        }
    }

    /// Parses a parenthesised group, consuming the surrounding parentheses.
    fn parse_group(&mut self, context: Option<&str>) -> Result<Option<Term>, QuerySyntaxError> {
        self.advance(); // consume (
        let inner = self.parse_list(context)?;

        if !self.peek().is_some_and(|l| l.is_control(')')) {
            return Err(QuerySyntaxError::new(
                SyntaxErrorKind::UnmatchedBracket,
                "Missing closing [)]",
                self.current_position(),
                self.query,
            ));
        }
        self.advance(); // consume )

        Ok(inner)
    }

    /// Parses: value_or_range → TEXT | QTEXT | NUMBER | range
    fn parse_value_or_range(&mut self, context: Option<&str>) -> Result<Term, QuerySyntaxError> {
        let Some(lexeme) = self.peek().cloned() else {
            return Err(self.unexpected_end());
        };

        if lexeme.is_control('[') || lexeme.is_control('{') {
            return self.parse_range(context);
        }

        let position = lexeme.position;
        let term = match (lexeme.kind, lexeme.value) {
            (LexemeKind::Text, LexemeValue::Text(text)) if text.contains(['*', '?']) => {
                self.builder.wildcard(text, context)
            }
            (LexemeKind::Text | LexemeKind::QText, LexemeValue::Text(text)) => {
                self.builder.value(Literal::Str(text), context)
            }
            (LexemeKind::Number, LexemeValue::Number(n)) => {
                self.builder.value(Literal::Number(n), context)
            }
            (kind, value) => {
                return Err(self.unexpected(&Lexeme {
                    kind,
                    value,
                    position,
                }));
            }
        };
        self.advance();

        Ok(term)
    }

    /// Parses: ("[" | "{") value "TO" value ("]" | "}")
    fn parse_range(&mut self, context: Option<&str>) -> Result<Term, QuerySyntaxError> {
        let inclusive = self.peek().is_some_and(|l| l.is_control('['));
        let (open, close) = if inclusive { ('[', ']') } else { ('{', '}') };
        self.advance(); // consume opening bracket

        let lo = self.parse_bound(&format!("Missing first value in value range after [{open}]"))?;

        if !self
            .peek()
            .is_some_and(|l| l.kind == LexemeKind::Text && l.as_str() == Some("TO"))
        {
            return Err(self.malformed_range(
                "Missing keyword \"TO\" after first value in value range",
            ));
        }
        self.advance(); // consume TO

        let hi = self.parse_bound("Missing second value in value range after \"TO\"")?;

        if !self.peek().is_some_and(|l| l.is_control(close)) {
            return Err(self.malformed_range(&format!("Missing closing [{close}]")));
        }
        self.advance(); // consume closing bracket

        Ok(if inclusive {
            self.builder.in_range(lo, hi, context)
        } else {
            self.builder.within(lo, hi, context)
        })
    }

    /// Parses one bound of a value range.
    fn parse_bound(&mut self, message: &str) -> Result<Literal, QuerySyntaxError> {
        let literal = match self.peek().map(|l| (l.kind, &l.value)) {
            Some((LexemeKind::Text | LexemeKind::QText, LexemeValue::Text(text))) => {
                Literal::Str(text.clone())
            }
            Some((LexemeKind::Number, LexemeValue::Number(n))) => Literal::Number(*n),
            _ => return Err(self.malformed_range(message)),
        };
        self.advance();
        Ok(literal)
    }

    /// Consumes the keyword `word` if it is next, returning its position.
    fn take_keyword(&mut self, word: &str) -> Option<usize> {
        let position = self.peek().filter(|l| l.is_keyword(word))?.position;
        self.advance();
        Some(position)
    }

    /// Whether the current list has no more terms.
    fn at_list_end(&self) -> bool {
        self.peek().is_none_or(|l| l.is_control(')'))
    }

    /// Character position of the next lexeme, or the end of the query.
    fn current_position(&self) -> usize {
        self.peek().map_or(self.end, |l| l.position)
    }

    /// Error for a lexeme that does not fit the grammar.
    fn unexpected(&self, lexeme: &Lexeme) -> QuerySyntaxError {
        QuerySyntaxError::new(
            SyntaxErrorKind::UnexpectedLexeme,
            format!("Unexpected [{}]", lexeme.value),
            lexeme.position,
            self.query,
        )
    }

    /// Error for input ending where a term was required.
    fn unexpected_end(&self) -> QuerySyntaxError {
        QuerySyntaxError::new(
            SyntaxErrorKind::UnexpectedLexeme,
            "Unexpected end of query",
            self.end,
            self.query,
        )
    }

    /// Error for an operator with nothing after it.
    fn missing_after(&self, position: usize, keyword: &str) -> QuerySyntaxError {
        QuerySyntaxError::new(
            SyntaxErrorKind::MissingOperand,
            format!("Term missing after {keyword}"),
            position,
            self.query,
        )
    }

    /// Error for an operator with nothing before it.
    fn missing_before(&self, position: usize, keyword: &str) -> QuerySyntaxError {
        QuerySyntaxError::new(
            SyntaxErrorKind::MissingOperand,
            format!("Term missing before {keyword}"),
            position,
            self.query,
        )
    }

    /// Error for a malformed value range at the current position.
    fn malformed_range(&self, message: &str) -> QuerySyntaxError {
        QuerySyntaxError::new(
            SyntaxErrorKind::MalformedRange,
            message,
            self.current_position(),
            self.query,
        )
    }

    /// Returns the current lexeme without consuming it.
    fn peek(&self) -> Option<&Lexeme> {
        self.lexemes.get(self.position)
    }

    /// Advances to the next lexeme.
    fn advance(&mut self) {
        if self.position < self.lexemes.len() {
            self.position += 1;
        }
    }

    /// Steps back over the lexeme just consumed.
    fn unpeek(&mut self) {
        self.position = self.position.saturating_sub(1);
    }
}

/// Parses a query string into an AST.
///
/// Returns `Ok(None)` for empty queries, `Ok(Some(term))` for valid queries,
/// or `Err(QuerySyntaxError)` for invalid syntax.
pub fn parse(input: &str) -> Result<Option<Term>, QuerySyntaxError> {
    parse_with(input, &DefaultBuilder)
}

/// Parses a query string, building nodes with `builder`.
pub fn parse_with<B: Builder + ?Sized>(
    input: &str,
    builder: &B,
) -> Result<Option<Term>, QuerySyntaxError> {
    let lexemes = tokenize(input)?;
    debug!(query = input, lexemes = lexemes.len(), "parsing query");
    Parser::new(input, lexemes, builder).parse()
}
