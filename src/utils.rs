//! Utilities that are used across the `amrsum` subcommands.

pub mod args;
