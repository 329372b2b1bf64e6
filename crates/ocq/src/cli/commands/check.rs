//! Implementation of `ocq check`.

use std::process::ExitCode;

use ocq_query::parse;
use tracing::info;

use crate::cli::{args::CheckCommand, output::print_syntax_error};

/// Validates each query in turn, failing on the first syntax error.
pub fn run(cmd: &CheckCommand) -> ExitCode {
    for query in &cmd.queries {
        match parse(query) {
            Ok(term) => {
                if term.is_none() {
                    info!(query = %query, "query is empty");
                }
                println!("ok: {query}");
            }
            Err(e) => {
                print_syntax_error(&e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
