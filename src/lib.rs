//! `amrsum` is a command line tool that summarises antimicrobial-resistance
//! and typing results across a cohort of sequenced samples. This package is
//! composed of both a library crate, as well as a binary crate.
//!
//! Result files are discovered under a directory and classified by name into
//! a sample and a type ([`organise`]). The genes and identity scores of each
//! file are extracted whatever tool produced it ([`extract`]) and assembled
//! into gene × file matrices ([`compare`]) alongside a presence overview of
//! which sample has results of which type ([`overview`]). Both end up in
//! `.xlsx` workbooks ([`report`]). Separately, paired reads can be submitted
//! to a Galaxy pipeline ([`pipeline`]).
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]
#![warn(rust_2021_compatibility)]

pub mod compare;
pub mod config;
pub mod errors;
pub mod extract;
pub mod list;
pub mod matrix;
pub mod organise;
pub mod overview;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod summarize;
pub mod utils;
