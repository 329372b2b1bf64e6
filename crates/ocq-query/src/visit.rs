//! Post-order traversal over query terms.
//!
//! Translators consume a parsed query by implementing [`Visitor`] and calling
//! [`Term::accept`](crate::Term::accept). Children are always visited before
//! their parent, and the parent callback receives the children's results.

use crate::ast::{Range, Value, Wildcard};

/// Callbacks invoked by [`Term::accept`](crate::Term::accept), one per node kind.
///
/// A callback may return `None`; that result is passed on to the parent as is.
pub trait Visitor {
    /// Result produced for each visited node.
    type Output;

    /// Visits a phrase with the results of its terms, in order.
    fn visit_phrase(&mut self, terms: Vec<Option<Self::Output>>) -> Option<Self::Output>;

    /// Visits a conjunction.
    fn visit_and(
        &mut self,
        left: Option<Self::Output>,
        right: Option<Self::Output>,
    ) -> Option<Self::Output>;

    /// Visits a disjunction.
    fn visit_or(
        &mut self,
        left: Option<Self::Output>,
        right: Option<Self::Output>,
    ) -> Option<Self::Output>;

    /// Visits a negation.
    fn visit_not(&mut self, term: Option<Self::Output>) -> Option<Self::Output>;

    /// Visits a required field query.
    fn visit_include(&mut self, term: Option<Self::Output>) -> Option<Self::Output>;

    /// Visits a forbidden field query.
    fn visit_exclude(&mut self, term: Option<Self::Output>) -> Option<Self::Output>;

    /// Visits an equality match.
    fn visit_value(&mut self, value: &Value) -> Option<Self::Output>;

    /// Visits a pattern match.
    fn visit_wildcard(&mut self, wildcard: &Wildcard) -> Option<Self::Output>;

    /// Visits a range match.
    fn visit_range(&mut self, range: &Range) -> Option<Self::Output>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Literal, Number, Term};

    /// Records each node as it is visited and returns its visit index.
    #[derive(Default)]
    struct Recorder {
        order: Vec<String>,
    }

    impl Recorder {
        fn record(&mut self, label: String) -> Option<usize> {
            self.order.push(label);
            Some(self.order.len() - 1)
        }
    }

    impl Visitor for Recorder {
        type Output = usize;

        fn visit_phrase(&mut self, terms: Vec<Option<usize>>) -> Option<usize> {
            let children: Vec<usize> = terms.into_iter().flatten().collect();
            self.record(format!("phrase{children:?}"))
        }

        fn visit_and(&mut self, left: Option<usize>, right: Option<usize>) -> Option<usize> {
            self.record(format!("and({left:?},{right:?})"))
        }

        fn visit_or(&mut self, left: Option<usize>, right: Option<usize>) -> Option<usize> {
            self.record(format!("or({left:?},{right:?})"))
        }

        fn visit_not(&mut self, term: Option<usize>) -> Option<usize> {
            self.record(format!("not({term:?})"))
        }

        fn visit_include(&mut self, term: Option<usize>) -> Option<usize> {
            self.record(format!("include({term:?})"))
        }

        fn visit_exclude(&mut self, term: Option<usize>) -> Option<usize> {
            self.record(format!("exclude({term:?})"))
        }

        fn visit_value(&mut self, value: &Value) -> Option<usize> {
            self.record(format!("value({})", value.value))
        }

        fn visit_wildcard(&mut self, wildcard: &Wildcard) -> Option<usize> {
            self.record(format!("wildcard({})", wildcard.pattern))
        }

        fn visit_range(&mut self, range: &Range) -> Option<usize> {
            self.record(format!("range({} TO {})", range.lo, range.hi))
        }
    }

    /// Evaluates a query against a single record of `(field, number)` pairs.
    struct Matcher<'a> {
        record: &'a [(&'a str, i64)],
    }

    impl Matcher<'_> {
        fn lookup(&self, name: Option<&str>) -> Option<i64> {
            let name = name?;
            self.record.iter().find(|(k, _)| *k == name).map(|(_, v)| *v)
        }
    }

    fn float(number: Number) -> f64 {
        match number {
            Number::Int(n) => n as f64,
            Number::Float(x) => x,
        }
    }

    impl Visitor for Matcher<'_> {
        type Output = bool;

        fn visit_phrase(&mut self, terms: Vec<Option<bool>>) -> Option<bool> {
            Some(terms.into_iter().all(|t| t.unwrap_or(true)))
        }

        fn visit_and(&mut self, left: Option<bool>, right: Option<bool>) -> Option<bool> {
            Some(left? && right?)
        }

        fn visit_or(&mut self, left: Option<bool>, right: Option<bool>) -> Option<bool> {
            Some(left? || right?)
        }

        fn visit_not(&mut self, term: Option<bool>) -> Option<bool> {
            term.map(|t| !t)
        }

        fn visit_include(&mut self, term: Option<bool>) -> Option<bool> {
            term
        }

        fn visit_exclude(&mut self, term: Option<bool>) -> Option<bool> {
            term.map(|t| !t)
        }

        fn visit_value(&mut self, value: &Value) -> Option<bool> {
            let actual = self.lookup(value.name.as_deref());
            Some(matches!(value.value, Literal::Number(Number::Int(n)) if Some(n) == actual))
        }

        fn visit_wildcard(&mut self, _wildcard: &Wildcard) -> Option<bool> {
            None
        }

        fn visit_range(&mut self, range: &Range) -> Option<bool> {
            let actual = self.lookup(range.name.as_deref())?;
            let (Literal::Number(lo), Literal::Number(hi)) = (&range.lo, &range.hi) else {
                return None;
            };
            let (lo, hi, actual) = (float(*lo), float(*hi), actual as f64);
            Some(if range.inclusive {
                lo <= actual && actual <= hi
            } else {
                lo < actual && actual < hi
            })
        }
    }

    #[test]
    fn children_before_parents() {
        let term = Term::and(
            Term::or(Term::value("cat", None), Term::value("dog", None)),
            Term::not(Term::value("snake", None)),
        );
        let mut recorder = Recorder::default();
        let root = term.accept(&mut recorder);

        assert_eq!(root, Some(5));
        assert_eq!(
            recorder.order,
            vec![
                "value(cat)",
                "value(dog)",
                "or(Some(0),Some(1))",
                "value(snake)",
                "not(Some(3))",
                "and(Some(2),Some(4))",
            ]
        );
    }

    #[test]
    fn phrase_receives_results_in_order() {
        let term = Term::phrase(vec![
            Term::include(Term::value("cat", None)),
            Term::exclude(Term::wildcard("d*g", None)),
            Term::range(0, 10, true, Some("depth")),
        ]);
        let mut recorder = Recorder::default();
        term.accept(&mut recorder);

        assert_eq!(recorder.order.last().unwrap(), "phrase[1, 3, 4]");
        assert_eq!(recorder.order[2], "wildcard(d*g)");
        assert_eq!(recorder.order[4], "range(0 TO 10)");
    }

    #[test]
    fn evaluates_against_record() {
        let record = [("depth", 50), ("year", 2004)];
        let term = Term::and(
            Term::range(0, 100, true, Some("depth")),
            Term::not(Term::value(2003, Some("year"))),
        );
        assert_eq!(term.accept(&mut Matcher { record: &record }), Some(true));

        let term = Term::range(0, 50, false, Some("depth"));
        assert_eq!(term.accept(&mut Matcher { record: &record }), Some(false));
    }

    #[test]
    fn none_propagates_to_parent() {
        let record = [("depth", 50)];
        let term = Term::and(
            Term::wildcard("c*t", None),
            Term::value(50, Some("depth")),
        );
        assert_eq!(term.accept(&mut Matcher { record: &record }), None);
    }
}
