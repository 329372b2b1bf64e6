//! Query language for filtering ocean-colour database records.
//!
//! This crate turns a human-typed query into a typed AST:
//!
//! - **Values**: `chlor_a` - match anywhere
//! - **Fields**: `cruise:AE1319` - match a specific field
//! - **Quoted text**: `"sea surface"` - literal text, never a wildcard
//! - **Wildcards**: `station:BATS*` - `*` and `?` patterns
//! - **Ranges**: `depth:[0 TO 100]` inclusive, `depth:{0 TO 100}` exclusive
//! - **Boolean operators**: `AND`, `OR`, `NOT` and grouping with `( )`
//! - **Modifiers**: `+cruise:AE1319 -flag:bad` - required and forbidden values
//! - **Field groups**: `investigator:(smith OR jones)` - field applies inside the group
//!
//! Downstream translators walk a parsed [`Term`] with a [`Visitor`].
//!
//! # Example
//!
//! ```
//! use ocq_query::{Term, parse};
//!
//! let term = parse("depth:[0 TO 100] AND NOT flag:bad").unwrap().unwrap();
//! assert_eq!(
//!     term,
//!     Term::and(
//!         Term::range(0, 100, true, Some("depth")),
//!         Term::not(Term::value("bad", Some("flag"))),
//!     )
//! );
//! assert_eq!(term.to_string(), "depth:[0 TO 100] AND NOT flag:bad");
//! ```

#![warn(missing_docs)]

mod ast;
mod builder;
mod error;
mod lexeme;
mod parser;
mod tokenizer;
mod visit;

pub use ast::{Literal, Range, Term, Value, Wildcard};
pub use builder::{Builder, DefaultBuilder};
pub use error::{QuerySyntaxError, SyntaxErrorKind};
pub use lexeme::{Lexeme, LexemeKind, LexemeValue, Number};
pub use parser::{parse, parse_with};
pub use tokenizer::tokenize;
pub use visit::Visitor;
