//! Functionality related to the `amrsum summarize` subcommand.

pub mod command;
