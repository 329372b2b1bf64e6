//! Rendering and JSON serialization for CLI output.

use std::process::ExitCode;

use ocq_query::{
    Lexeme, LexemeValue, Literal, Number, QuerySyntaxError, Range, Term, Value, Visitor, Wildcard,
};
use serde::Serialize;
use serde_json::json;

/// JSON output for a single parsed query.
#[derive(Serialize)]
struct JsonParsedQuery {
    /// The original query string.
    query: String,
    /// Canonical form, or `None` for an empty query.
    canonical: Option<String>,
    /// Encoded syntax tree, `null` for an empty query.
    ast: serde_json::Value,
}

/// JSON output for `ocq parse`.
#[derive(Serialize)]
struct JsonParseOutput {
    /// Results in argument order.
    queries: Vec<JsonParsedQuery>,
}

/// JSON output for a single lexeme.
#[derive(Serialize)]
struct JsonLexeme {
    /// Upper-case lexical class.
    kind: &'static str,
    /// String or number payload.
    value: serde_json::Value,
    /// Zero-based character index.
    position: usize,
}

/// Prints `value` as pretty JSON.
fn print_json<T: Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json_str) => {
            println!("{json_str}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: failed to serialize JSON: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Prints a syntax error with a caret under the fault and an optional hint.
pub fn print_syntax_error(err: &QuerySyntaxError) {
    eprintln!("error: {}", err.format_with_context());
    if let Some(hint) = err.suggestion() {
        eprintln!("hint: {hint}");
    }
}

/// Encodes a numeric literal as a JSON number.
fn number_json(number: Number) -> serde_json::Value {
    match number {
        Number::Int(n) => json!(n),
        Number::Float(x) => json!(x),
    }
}

/// Encodes a literal as a JSON string or number.
fn literal_json(literal: &Literal) -> serde_json::Value {
    match literal {
        Literal::Str(s) => json!(s),
        Literal::Number(n) => number_json(*n),
    }
}

/// Visitor that encodes a term as a JSON object per node.
struct JsonEncoder;

impl Visitor for JsonEncoder {
    type Output = serde_json::Value;

    fn visit_phrase(&mut self, terms: Vec<Option<Self::Output>>) -> Option<Self::Output> {
        let terms: Vec<_> = terms.into_iter().flatten().collect();
        Some(json!({ "type": "phrase", "terms": terms }))
    }

    fn visit_and(
        &mut self,
        left: Option<Self::Output>,
        right: Option<Self::Output>,
    ) -> Option<Self::Output> {
        Some(json!({ "type": "and", "left": left, "right": right }))
    }

    fn visit_or(
        &mut self,
        left: Option<Self::Output>,
        right: Option<Self::Output>,
    ) -> Option<Self::Output> {
        Some(json!({ "type": "or", "left": left, "right": right }))
    }

    fn visit_not(&mut self, term: Option<Self::Output>) -> Option<Self::Output> {
        Some(json!({ "type": "not", "term": term }))
    }

    fn visit_include(&mut self, term: Option<Self::Output>) -> Option<Self::Output> {
        Some(json!({ "type": "include", "term": term }))
    }

    fn visit_exclude(&mut self, term: Option<Self::Output>) -> Option<Self::Output> {
        Some(json!({ "type": "exclude", "term": term }))
    }

    fn visit_value(&mut self, value: &Value) -> Option<Self::Output> {
        Some(json!({
            "type": "value",
            "field": value.name,
            "value": literal_json(&value.value),
        }))
    }

    fn visit_wildcard(&mut self, wildcard: &Wildcard) -> Option<Self::Output> {
        Some(json!({
            "type": "wildcard",
            "field": wildcard.name,
            "pattern": wildcard.pattern,
        }))
    }

    fn visit_range(&mut self, range: &Range) -> Option<Self::Output> {
        Some(json!({
            "type": "range",
            "field": range.name,
            "lo": literal_json(&range.lo),
            "hi": literal_json(&range.hi),
            "inclusive": range.inclusive,
        }))
    }
}

/// Visitor that renders a term as indented lines, one node per line.
struct TreeRenderer;

impl TreeRenderer {
    /// Labels a node and indents its children beneath it.
    fn node(label: &str, children: impl IntoIterator<Item = Option<Vec<String>>>) -> Vec<String> {
        let mut lines = vec![label.to_string()];
        for child in children.into_iter().flatten() {
            lines.extend(child.into_iter().map(|line| format!("  {line}")));
        }
        lines
    }

    /// Formats a leaf label with its optional field name.
    fn leaf(kind: &str, name: Option<&str>, body: &str) -> Vec<String> {
        match name {
            Some(name) => vec![format!("{kind} {name}: {body}")],
            None => vec![format!("{kind} {body}")],
        }
    }
}

impl Visitor for TreeRenderer {
    type Output = Vec<String>;

    fn visit_phrase(&mut self, terms: Vec<Option<Self::Output>>) -> Option<Self::Output> {
        Some(Self::node("Phrase", terms))
    }

    fn visit_and(
        &mut self,
        left: Option<Self::Output>,
        right: Option<Self::Output>,
    ) -> Option<Self::Output> {
        Some(Self::node("And", [left, right]))
    }

    fn visit_or(
        &mut self,
        left: Option<Self::Output>,
        right: Option<Self::Output>,
    ) -> Option<Self::Output> {
        Some(Self::node("Or", [left, right]))
    }

    fn visit_not(&mut self, term: Option<Self::Output>) -> Option<Self::Output> {
        Some(Self::node("Not", [term]))
    }

    fn visit_include(&mut self, term: Option<Self::Output>) -> Option<Self::Output> {
        Some(Self::node("Include", [term]))
    }

    fn visit_exclude(&mut self, term: Option<Self::Output>) -> Option<Self::Output> {
        Some(Self::node("Exclude", [term]))
    }

    fn visit_value(&mut self, value: &Value) -> Option<Self::Output> {
        Some(Self::leaf(
            "Value",
            value.name.as_deref(),
            &value.value.to_string(),
        ))
    }

    fn visit_wildcard(&mut self, wildcard: &Wildcard) -> Option<Self::Output> {
        Some(Self::leaf(
            "Wildcard",
            wildcard.name.as_deref(),
            &wildcard.pattern,
        ))
    }

    fn visit_range(&mut self, range: &Range) -> Option<Self::Output> {
        let (open, close) = if range.inclusive { ('[', ']') } else { ('{', '}') };
        let body = format!("{open}{} TO {}{close}", range.lo, range.hi);
        Some(Self::leaf("Range", range.name.as_deref(), &body))
    }
}

/// Encodes a parsed query as JSON, `null` when empty.
pub fn term_json(term: Option<&Term>) -> serde_json::Value {
    term.and_then(|t| t.accept(&mut JsonEncoder))
        .unwrap_or(serde_json::Value::Null)
}

/// Renders a parsed query as indented tree lines.
pub fn term_tree(term: &Term) -> Vec<String> {
    term.accept(&mut TreeRenderer).unwrap_or_default()
}

/// Outputs parsed queries as canonical text, trees, or JSON.
pub fn output_parsed(results: &[(String, Option<Term>)], tree: bool, json: bool) -> ExitCode {
    if json {
        let json_output = JsonParseOutput {
            queries: results
                .iter()
                .map(|(query, term)| JsonParsedQuery {
                    query: query.clone(),
                    canonical: term.as_ref().map(ToString::to_string),
                    ast: term_json(term.as_ref()),
                })
                .collect(),
        };
        return print_json(&json_output);
    }

    for (_, term) in results {
        match term {
            None => println!("(empty query)"),
            Some(term) if tree => term_tree(term).iter().for_each(|line| println!("{line}")),
            Some(term) => println!("{term}"),
        }
    }
    ExitCode::SUCCESS
}

/// Outputs lexemes one per line, or as a JSON array.
pub fn output_lexemes(lexemes: &[Lexeme], json: bool) -> ExitCode {
    if json {
        let json_output: Vec<_> = lexemes
            .iter()
            .map(|lexeme| JsonLexeme {
                kind: lexeme.kind.as_str(),
                value: match &lexeme.value {
                    LexemeValue::Text(s) => json!(s),
                    LexemeValue::Number(n) => number_json(*n),
                },
                position: lexeme.position,
            })
            .collect();
        return print_json(&json_output);
    }

    for lexeme in lexemes {
        println!("{lexeme}");
    }
    ExitCode::SUCCESS
}
