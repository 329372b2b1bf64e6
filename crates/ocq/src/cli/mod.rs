//! CLI support for the `ocq` binary.

pub mod args;
pub mod commands;
pub mod logging;
pub mod output;
