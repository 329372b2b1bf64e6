//! Node construction used by the parser.
//!
//! The parser never builds [`Term`]s directly; it asks a [`Builder`]. A
//! custom builder can normalise while building, as long as visitors observe
//! the same results they would on the canonical tree.

use crate::ast::{Literal, Term};

/// Factory for query terms, one constructor per node kind.
pub trait Builder {
    /// Builds a phrase from juxtaposed terms.
    fn phrase(&self, terms: Vec<Term>) -> Term;

    /// Builds a conjunction.
    fn and(&self, left: Term, right: Term) -> Term;

    /// Builds a disjunction.
    fn or(&self, left: Term, right: Term) -> Term;

    /// Builds a negation.
    fn not(&self, term: Term) -> Term;

    /// Builds a required field query.
    fn include(&self, term: Term) -> Term;

    /// Builds a forbidden field query.
    fn exclude(&self, term: Term) -> Term;

    /// Builds an equality match.
    fn value(&self, value: Literal, name: Option<&str>) -> Term;

    /// Builds a pattern match.
    fn wildcard(&self, pattern: String, name: Option<&str>) -> Term;

    /// Builds an inclusive range, `[lo TO hi]`.
    fn in_range(&self, lo: Literal, hi: Literal, name: Option<&str>) -> Term;

    /// Builds an exclusive range, `{lo TO hi}`.
    fn within(&self, lo: Literal, hi: Literal, name: Option<&str>) -> Term;
}

/// Builds the canonical [`Term`] for every node kind.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultBuilder;

impl Builder for DefaultBuilder {
    fn phrase(&self, terms: Vec<Term>) -> Term {
        Term::phrase(terms)
    }

    fn and(&self, left: Term, right: Term) -> Term {
        Term::and(left, right)
    }

    fn or(&self, left: Term, right: Term) -> Term {
        Term::or(left, right)
    }

    fn not(&self, term: Term) -> Term {
        Term::not(term)
    }

    fn include(&self, term: Term) -> Term {
        Term::include(term)
    }

    fn exclude(&self, term: Term) -> Term {
        Term::exclude(term)
    }

    fn value(&self, value: Literal, name: Option<&str>) -> Term {
        Term::value(value, name)
    }

    fn wildcard(&self, pattern: String, name: Option<&str>) -> Term {
        Term::wildcard(pattern, name)
    }

    fn in_range(&self, lo: Literal, hi: Literal, name: Option<&str>) -> Term {
        Term::range(lo, hi, true, name)
    }

    fn within(&self, lo: Literal, hi: Literal, name: Option<&str>) -> Term {
        Term::range(lo, hi, false, name)
    }
}
