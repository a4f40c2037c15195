//! Functionality related to the `amrsum plot` subcommand.

pub mod command;
pub mod overview;
pub mod workflow;
