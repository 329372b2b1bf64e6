//! Implementation of `ocq parse`.

use std::process::ExitCode;

use ocq_query::parse;
use tracing::debug;

use crate::cli::{
    args::ParseCommand,
    output::{output_parsed, print_syntax_error},
};

/// Parses every query and prints the results; stops at the first syntax error.
pub fn run(cmd: &ParseCommand) -> ExitCode {
    debug!(count = cmd.queries.len(), "parsing queries");

    let mut results = Vec::with_capacity(cmd.queries.len());
    for query in &cmd.queries {
        match parse(query) {
            Ok(term) => results.push((query.clone(), term)),
            Err(e) => {
                print_syntax_error(&e);
                return ExitCode::FAILURE;
            }
        }
    }

    output_parsed(&results, cmd.tree, cmd.output.json)
}
