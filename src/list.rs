//! Functionality related to the `amrsum list` subcommand.

pub mod command;
