//! Property tests for the tokenizer and parser invariants.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use ocq_query::{Literal, Term, parse, tokenize};
use proptest::{option, prelude::*};

/// Text that exercises quoting: plain words, reserved words and punctuation.
fn text() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_]{1,6}",
        Just("AND".to_string()),
        Just("TO".to_string()),
        Just("12".to_string()),
        "[ a-z0-9:()\\[\\]{}\"'\\\\+*?-]{0,6}",
    ]
}

/// String, integer or decimal literal.
fn literal() -> impl Strategy<Value = Literal> {
    prop_oneof![
        text().prop_map(Literal::Str),
        any::<i64>().prop_map(Literal::from),
        (-1.0e6f64..1.0e6f64).prop_map(Literal::from),
    ]
}

/// Field query with an optional field name.
fn field_query() -> impl Strategy<Value = Term> {
    prop_oneof![
        (literal(), option::of(text())).prop_map(|(v, n)| Term::value(v, n.as_deref())),
        ("[-a-z :]{0,3}[*?][a-z:+-]{0,3}", option::of(text()))
            .prop_map(|(p, n)| Term::wildcard(p, n.as_deref())),
        (literal(), literal(), any::<bool>(), option::of(text()))
            .prop_map(|(lo, hi, inclusive, n)| Term::range(lo, hi, inclusive, n.as_deref())),
    ]
}

/// Trees of the shapes the parser produces.
fn term() -> impl Strategy<Value = Term> {
    let base = prop_oneof![
        3 => field_query(),
        1 => field_query().prop_map(Term::include),
        1 => field_query().prop_map(Term::exclude),
    ];
    base.prop_recursive(4, 32, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 2..4).prop_map(Term::phrase),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Term::and(l, r)),
            (inner.clone(), inner.clone()).prop_map(|(l, r)| Term::or(l, r)),
            inner.prop_map(Term::not),
        ]
    })
}

/// Pieces of the surface syntax that queries are assembled from.
const FRAGMENTS: [&str; 20] = [
    "cat",
    "c*t",
    "d?g",
    "\"sea ice\"",
    "'x'",
    "AND",
    "OR",
    "NOT",
    "+",
    "-",
    "(",
    ")",
    "type:",
    "depth:[0 TO 5]",
    "{a TO b}",
    "12",
    "-3",
    "0.5",
    "\\:x",
    "x\\ y",
];

/// Queries assembled from fragments, with or without separating spaces.
fn query() -> impl Strategy<Value = String> {
    let part = (
        prop::sample::select(FRAGMENTS.to_vec()),
        prop::sample::select(vec!["", " "]),
    );
    prop::collection::vec(part, 0..10).prop_map(|parts| {
        parts
            .into_iter()
            .flat_map(|(fragment, sep)| [fragment, sep])
            .collect::<String>()
    })
}

/// Checks that modifiers wrap field queries and wildcards carry markers.
fn assert_well_formed(term: &Term) {
    match term {
        Term::Phrase(terms) => terms.iter().for_each(assert_well_formed),
        Term::And(l, r) | Term::Or(l, r) => {
            assert_well_formed(l);
            assert_well_formed(r);
        }
        Term::Not(t) => assert_well_formed(t),
        Term::Include(t) | Term::Exclude(t) => assert!(t.is_field_query(), "{term:?}"),
        Term::Wildcard(w) => assert!(w.pattern.contains(['*', '?']), "{term:?}"),
        Term::Value(_) | Term::Range(_) => {}
    }
}

/// Whether every `(` has a later `)` and no `)` comes first.
fn balanced(query: &str) -> bool {
    let mut depth = 0i32;
    for ch in query.chars() {
        match ch {
            '(' => depth += 1,
            ')' if depth == 0 => return false,
            ')' => depth -= 1,
            _ => {}
        }
    }
    depth == 0
}

proptest! {
    #[test]
    fn stringified_terms_parse_back(term in term()) {
        let text = term.to_string();
        let parsed = parse(&text);
        prop_assert_eq!(parsed, Ok(Some(term)), "query: {}", text);
    }

    #[test]
    fn parsed_queries_round_trip(query in query()) {
        if let Ok(Some(term)) = parse(&query) {
            let text = term.to_string();
            prop_assert_eq!(parse(&text), Ok(Some(term)), "query: {} -> {}", query, text);
        }
    }

    #[test]
    fn parsed_queries_are_well_formed(query in query()) {
        if let Ok(Some(term)) = parse(&query) {
            assert_well_formed(&term);
        }
    }

    #[test]
    fn positions_ascend_within_query(query in "[ a-z0-9:()\\[\\]{}\"'\\\\+*?-]{0,24}") {
        if let Ok(lexemes) = tokenize(&query) {
            let len = query.chars().count();
            for pair in lexemes.windows(2) {
                prop_assert!(pair[0].position < pair[1].position);
            }
            for lexeme in &lexemes {
                prop_assert!(lexeme.position < len);
            }
        }
    }

    #[test]
    fn tokenize_succeeds_iff_balanced(query in "[ a-c:()+-]{0,16}") {
        prop_assert_eq!(tokenize(&query).is_ok(), balanced(&query), "query: {}", query);
    }
}
