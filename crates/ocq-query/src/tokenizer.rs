//! Query tokenizer.
//!
//! A single pass over the query that segments it into [`Lexeme`]s. Bare text
//! accumulates in a pending window that is flushed and classified whenever a
//! separator, control character or quote is reached.

use std::{iter::Peekable, mem, str::Chars};

use tracing::trace;

use crate::{
    error::{QuerySyntaxError, SyntaxErrorKind},
    lexeme::{Lexeme, LexemeKind, Number},
};

/// Reserved words recognised in bare text.
const KEYWORDS: [&str; 3] = ["AND", "OR", "NOT"];

/// One character of the pending bare-text window.
struct Pending {
    /// The character, with any escaping backslash removed.
    ch: char,
    /// Character index of the character, or of its escaping backslash.
    position: usize,
    /// Whether the character was preceded by a backslash.
    escaped: bool,
}

/// Tokenizes a query string.
struct Tokenizer<'a> {
    /// The original input string.
    input: &'a str,
    /// Character iterator with one-character lookahead.
    chars: Peekable<Chars<'a>>,
    /// Current character position in input.
    position: usize,
    /// Positions of the currently unclosed `(`.
    open: Vec<usize>,
    /// Bare text seen since the last flush.
    window: Vec<Pending>,
    /// Lexemes emitted so far.
    lexemes: Vec<Lexeme>,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new tokenizer for the given input.
    fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            position: 0,
            open: Vec::new(),
            window: Vec::new(),
            lexemes: Vec::new(),
        }
    }

    /// Creates an error at a specific position.
    fn error_at(
        &self,
        kind: SyntaxErrorKind,
        message: impl Into<String>,
        position: usize,
    ) -> QuerySyntaxError {
        QuerySyntaxError::new(kind, message, position, self.input)
    }

    /// Tokenizes the entire input, returning all lexemes or an error.
    fn tokenize(mut self) -> Result<Vec<Lexeme>, QuerySyntaxError> {
        while let Some(&ch) = self.chars.peek() {
            match ch {
                c if c.is_whitespace() => {
                    self.flush();
                    self.advance();
                }
                '\\' => self.read_escape()?,
                ':' | '[' | ']' | '{' | '}' => {
                    self.flush();
                    self.emit_control(ch);
                }
                '(' => {
                    self.flush();
                    self.open.push(self.position);
                    self.emit_control(ch);
                }
                ')' => {
                    self.flush();
                    if self.open.pop().is_none() {
                        return Err(self.error_at(
                            SyntaxErrorKind::UnmatchedBracket,
                            "Unmatched closing [)]",
                            self.position,
                        ));
                    }
                    self.emit_control(ch);
                }
                '"' | '\'' => {
                    self.flush();
                    self.read_quoted(ch)?;
                }
                _ => {
                    self.window.push(Pending {
                        ch,
                        position: self.position,
                        escaped: false,
                    });
                    self.advance();
                }
            }
        }
        self.flush();

        if let Some(&position) = self.open.last() {
            return Err(self.error_at(
                SyntaxErrorKind::UnmatchedBracket,
                "Missing closing [)]",
                position,
            ));
        }

        trace!(count = self.lexemes.len(), "tokenized query");
        Ok(self.lexemes)
    }

    /// Emits a single-character control lexeme at the cursor and moves past it.
    fn emit_control(&mut self, ch: char) {
        self.lexemes.push(Lexeme::text(LexemeKind::Control, ch, self.position));
        self.advance();
    }

    /// Adds the character after a backslash to the window as literal text.
    fn read_escape(&mut self) -> Result<(), QuerySyntaxError> {
        let start = self.position;
        self.advance(); // consume backslash

        let Some(&ch) = self.chars.peek() else {
            return Err(self.error_at(
                SyntaxErrorKind::DanglingEscape,
                "Missing character after escape [\\]",
                start,
            ));
        };
        self.window.push(Pending {
            ch,
            position: start,
            escaped: true,
        });
        self.advance();
        Ok(())
    }

    /// Reads a run quoted by `quote` and emits it as `QText`.
    fn read_quoted(&mut self, quote: char) -> Result<(), QuerySyntaxError> {
        let start = self.position;
        self.advance(); // consume opening quote

        let mut content = String::new();
        loop {
            match self.chars.peek() {
                Some(&ch) if ch == quote => {
                    self.advance(); // consume closing quote
                    self.lexemes.push(Lexeme::text(LexemeKind::QText, content, start));
                    return Ok(());
                }
                Some(&'\\') => {
                    self.advance();
                    let Some(&ch) = self.chars.peek() else {
                        break;
                    };
                    content.push(ch);
                    self.advance();
                }
                Some(&ch) => {
                    content.push(ch);
                    self.advance();
                }
                None => break,
            }
        }

        Err(self.error_at(
            SyntaxErrorKind::UnterminatedQuote,
            format!("Missing matching [{quote}]"),
            start,
        ))
    }

    /// Classifies and emits the pending bare-text window.
    fn flush(&mut self) {
        if self.window.is_empty() {
            return;
        }
        let window = mem::take(&mut self.window);
        let start = window[0].position;
        let text: String = window.iter().map(|p| p.ch).collect();

        if KEYWORDS.contains(&text.as_str()) {
            self.lexemes.push(Lexeme::text(LexemeKind::Keyword, text, start));
            return;
        }
        if let Some(number) = Number::parse(&text) {
            self.lexemes.push(Lexeme::number(number, start));
            return;
        }

        // Leading unescaped + and - are modifiers in their own right.
        let lead = window
            .iter()
            .take_while(|p| !p.escaped && matches!(p.ch, '+' | '-'))
            .count();
        for p in &window[..lead] {
            self.lexemes.push(Lexeme::text(LexemeKind::Control, p.ch, p.position));
        }
        if let Some(first) = window.get(lead) {
            let rest: String = window[lead..].iter().map(|p| p.ch).collect();
            self.lexemes.push(Lexeme::text(LexemeKind::Text, rest, first.position));
        }
    }

    /// Advances to the next character.
    fn advance(&mut self) {
        if self.chars.next().is_some() {
            self.position += 1;
        }
    }
}

/// Splits a query string into lexemes.
///
/// Fails on unbalanced parentheses, unterminated quotes and a trailing
/// backslash.
pub fn tokenize(input: &str) -> Result<Vec<Lexeme>, QuerySyntaxError> {
    Tokenizer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctl(ch: char, position: usize) -> Lexeme {
        Lexeme::text(LexemeKind::Control, ch, position)
    }

    fn text(s: &str, position: usize) -> Lexeme {
        Lexeme::text(LexemeKind::Text, s, position)
    }

    fn qtext(s: &str, position: usize) -> Lexeme {
        Lexeme::text(LexemeKind::QText, s, position)
    }

    fn kw(s: &str, position: usize) -> Lexeme {
        Lexeme::text(LexemeKind::Keyword, s, position)
    }

    fn int(n: i64, position: usize) -> Lexeme {
        Lexeme::number(Number::Int(n), position)
    }

    #[test]
    fn empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }

    #[test]
    fn whitespace_only() {
        assert_eq!(tokenize(" \t  ").unwrap(), vec![]);
    }

    #[test]
    fn single_word() {
        assert_eq!(tokenize("cat").unwrap(), vec![text("cat", 0)]);
    }

    #[test]
    fn keywords() {
        assert_eq!(
            tokenize("cat AND  dog ").unwrap(),
            vec![text("cat", 0), kw("AND", 4), text("dog", 9)]
        );
        assert_eq!(
            tokenize("NOT a OR b").unwrap(),
            vec![kw("NOT", 0), text("a", 4), kw("OR", 6), text("b", 9)]
        );
    }

    #[test]
    fn keywords_are_case_sensitive() {
        assert_eq!(
            tokenize("cat and dog").unwrap(),
            vec![text("cat", 0), text("and", 4), text("dog", 8)]
        );
    }

    #[test]
    fn field_separator() {
        assert_eq!(
            tokenize("type:cat").unwrap(),
            vec![text("type", 0), ctl(':', 4), text("cat", 5)]
        );
    }

    #[test]
    fn escaped_separator_stays_in_text() {
        assert_eq!(tokenize("type\\:cat").unwrap(), vec![text("type:cat", 0)]);
    }

    #[test]
    fn escaped_whitespace_stays_in_text() {
        assert_eq!(tokenize("sea\\ ice").unwrap(), vec![text("sea ice", 0)]);
    }

    #[test]
    fn escaped_modifier_is_text() {
        assert_eq!(tokenize("\\-cat").unwrap(), vec![text("-cat", 0)]);
        assert_eq!(tokenize("\\+").unwrap(), vec![text("+", 0)]);
    }

    #[test]
    fn dangling_escape() {
        let err = tokenize("cat\\").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::DanglingEscape);
        assert_eq!(err.position, 3);
    }

    #[test]
    fn modifiers() {
        assert_eq!(
            tokenize("+cat -dog").unwrap(),
            vec![ctl('+', 0), text("cat", 1), ctl('-', 5), text("dog", 6)]
        );
    }

    #[test]
    fn standalone_modifier() {
        assert_eq!(
            tokenize("+ cat").unwrap(),
            vec![ctl('+', 0), text("cat", 2)]
        );
    }

    #[test]
    fn stacked_modifiers() {
        assert_eq!(
            tokenize("+-cat").unwrap(),
            vec![ctl('+', 0), ctl('-', 1), text("cat", 2)]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            tokenize("12 -3 0.5").unwrap(),
            vec![
                int(12, 0),
                int(-3, 3),
                Lexeme::number(Number::Float(0.5), 6)
            ]
        );
    }

    #[test]
    fn integers_wider_than_i64_stay_text() {
        assert_eq!(
            tokenize("9223372036854775807 9223372036854775808").unwrap(),
            vec![int(i64::MAX, 0), text("9223372036854775808", 20)]
        );
        assert_eq!(
            tokenize("id:12345678901234567890123").unwrap(),
            vec![text("id", 0), ctl(':', 2), text("12345678901234567890123", 3)]
        );
        assert_eq!(
            tokenize("-9223372036854775809").unwrap(),
            vec![ctl('-', 0), text("9223372036854775809", 1)]
        );
    }

    #[test]
    fn brackets() {
        assert_eq!(
            tokenize("depth:[0 TO 100]").unwrap(),
            vec![
                text("depth", 0),
                ctl(':', 5),
                ctl('[', 6),
                int(0, 7),
                text("TO", 9),
                int(100, 12),
                ctl(']', 15)
            ]
        );
        assert_eq!(
            tokenize("{a TO b}").unwrap(),
            vec![ctl('{', 0), text("a", 1), text("TO", 3), text("b", 6), ctl('}', 7)]
        );
    }

    #[test]
    fn parentheses() {
        assert_eq!(
            tokenize("(cat dog)").unwrap(),
            vec![ctl('(', 0), text("cat", 1), text("dog", 5), ctl(')', 8)]
        );
    }

    #[test]
    fn quoted_text() {
        assert_eq!(
            tokenize("\"sea ice\" 'chl a'").unwrap(),
            vec![qtext("sea ice", 0), qtext("chl a", 10)]
        );
    }

    #[test]
    fn quoted_text_flushes_window() {
        assert_eq!(
            tokenize("name:\"chl a\"").unwrap(),
            vec![text("name", 0), ctl(':', 4), qtext("chl a", 5)]
        );
        assert_eq!(
            tokenize("ab\"cd\"").unwrap(),
            vec![text("ab", 0), qtext("cd", 2)]
        );
    }

    #[test]
    fn quoted_keyword_is_text() {
        assert_eq!(tokenize("\"AND\"").unwrap(), vec![qtext("AND", 0)]);
    }

    #[test]
    fn other_quote_inside_quoted_text() {
        assert_eq!(tokenize("\"it's\"").unwrap(), vec![qtext("it's", 0)]);
    }

    #[test]
    fn escaped_quote_inside_quoted_text() {
        assert_eq!(
            tokenize("\"say \\\"hi\\\"\"").unwrap(),
            vec![qtext("say \"hi\"", 0)]
        );
    }

    #[test]
    fn wildcards_are_plain_text() {
        assert_eq!(
            tokenize("animal:c*t").unwrap(),
            vec![text("animal", 0), ctl(':', 6), text("c*t", 7)]
        );
    }

    #[test]
    fn unterminated_quote() {
        let err = tokenize("\"cat AND  dog").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnterminatedQuote);
        assert_eq!(err.position, 0);
        assert!(err.message.contains("Missing matching [\"]"));
    }

    #[test]
    fn unterminated_single_quote() {
        let err = tokenize("a 'b").unwrap_err();
        assert!(err.message.contains("Missing matching [']"));
        assert_eq!(err.position, 2);
    }

    #[test]
    fn unmatched_open() {
        let err = tokenize("cat AND (dog OR NOT snake").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnmatchedBracket);
        assert_eq!(err.position, 8);
    }

    #[test]
    fn unmatched_close() {
        let err = tokenize("cat) (dog").unwrap_err();
        assert_eq!(err.kind, SyntaxErrorKind::UnmatchedBracket);
        assert_eq!(err.position, 3);
    }

    #[test]
    fn positions_count_characters() {
        assert_eq!(
            tokenize("é b").unwrap(),
            vec![text("é", 0), text("b", 2)]
        );
    }
}
