//! Implementation of `ocq tokens`.

use std::process::ExitCode;

use ocq_query::tokenize;

use crate::cli::{
    args::TokensCommand,
    output::{output_lexemes, print_syntax_error},
};

/// Tokenizes the query and prints its lexemes.
pub fn run(cmd: &TokensCommand) -> ExitCode {
    match tokenize(&cmd.query) {
        Ok(lexemes) => output_lexemes(&lexemes, cmd.output.json),
        Err(e) => {
            print_syntax_error(&e);
            ExitCode::FAILURE
        }
    }
}
