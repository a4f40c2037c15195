//! Functionality related to the `amrsum list` command itself.

use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use clap::builder::PossibleValuesParser;
use clap::Args;
use prettytable::row;
use prettytable::Table;

use crate::config::Config;
use crate::extract::dialect::ScoreSource;
use crate::extract::dialect::DIALECTS;
use crate::plot::command::get_all_figures;

//========================//
// Command-line arguments //
//========================//

/// Command line arguments for `amrsum list`.
#[derive(Args)]
pub struct ListArgs {
    /// The subject which you want to list values for.
    #[arg(value_parser = PossibleValuesParser::new(["dialects", "config", "plots"]))]
    subject: String,

    /// A TOML file overriding the default configuration.
    #[arg(long, value_name = "TOML", env = "AMRSUM_CONFIG")]
    config: Option<PathBuf>,
}

//==============//
// Main command //
//==============//

/// Main method for the `amrsum list` subcommand.
pub fn list(args: ListArgs) -> anyhow::Result<()> {
    match args.subject.as_str() {
        "dialects" => {
            dialects_table().printstd();
            Ok(())
        }
        "config" => {
            let config = Config::load(args.config.as_deref()).context("loading configuration")?;
            config_table(&config).printstd();
            Ok(())
        }
        "plots" => {
            let mut table = Table::new();
            table.add_row(row!["Name", "File", "Description"]);
            for figure in get_all_figures() {
                table.add_row(row![
                    figure.name(),
                    format!("{}.html", figure.filename()),
                    figure.description()
                ]);
            }

            table.printstd();
            Ok(())
        }
        s => bail!("Unsupported subject: {}", s),
    }
}

/// The dialects in the order they are tried.
pub fn dialects_table() -> Table {
    let mut table = Table::new();
    table.add_row(row!["#", "Name", "Required columns", "Gene", "Score"]);

    for (i, dialect) in DIALECTS.iter().enumerate() {
        let score = match dialect.score {
            ScoreSource::Column(c) => String::from(c),
            ScoreSource::Passed => String::from("PASSED"),
            ScoreSource::Genotype => String::from("Quality Module"),
        };
        table.add_row(row![
            i + 1,
            dialect.name,
            dialect.requires.join(" + "),
            dialect.gene_column,
            score
        ]);
    }

    table
}

/// The effective configuration, one setting per row.
pub fn config_table(config: &Config) -> Table {
    let mut table = Table::new();
    table.add_row(row!["Setting", "Value"]);
    table.add_row(row!["identity_cutoff", config.identity_cutoff]);
    table.add_row(row!["quality_passed", config.quality_passed]);
    table.add_row(row!["quality_failed", config.quality_failed]);
    table.add_row(row!["missing_value", config.missing_value]);
    table.add_row(row!["genes_to_filter", config.genes_to_filter.join(", ")]);
    table.add_row(row!["sniff_bytes", config.sniff_bytes]);
    table.add_row(row![
        "default_delimiter",
        config.default_delimiter.escape_default()
    ]);
    table.add_row(row!["pipeline.tool_id", config.pipeline.tool_id]);
    table.add_row(row![
        "pipeline.poll_interval_secs",
        config.pipeline.poll_interval_secs
    ]);
    table.add_row(row!["pipeline.timeout_secs", config.pipeline.timeout_secs]);
    table.add_row(row![
        "pipeline.amr_databases",
        config.pipeline.amr_databases.join(", ")
    ]);
    table.add_row(row![
        "pipeline.mlst_schemes",
        config.pipeline.mlst_schemes.join(", ")
    ]);
    table.add_row(row![
        "pipeline.detection_method",
        config.pipeline.detection_method
    ]);
    table.add_row(row!["pipeline.library", config.pipeline.library]);

    table
}
