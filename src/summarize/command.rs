//! Functionality related to the `amrsum summarize` command itself.

use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::debug;
use tracing::info;

use crate::compare::apply;
use crate::compare::Comparator;
use crate::compare::ComparisonOptions;
use crate::compare::Unrecognized;
use crate::config::Config;
use crate::organise::index::Unclassifiable;
use crate::organise::SampleIndex;
use crate::overview::build_overview;
use crate::overview::command::OVERVIEW_FILE;
use crate::overview::command::OVERVIEW_SHEET;
use crate::report::write_workbook;
use crate::report::Sheet;
use crate::utils::args::output_directory;
use crate::utils::args::SharedArgs;

/// File name of the comparison workbook.
pub const COMPARISON_FILE: &str = "comparison_all.xlsx";

/// Command line arguments for `amrsum summarize`.
#[derive(Args)]
pub struct SummarizeArgs {
    /// Directory holding the per-sample result files.
    #[arg(value_name = "DIR")]
    src: PathBuf,

    /// The directory to output the workbooks to.
    #[arg(short, long, value_name = "PATH")]
    output_directory: Option<PathBuf>,

    #[command(flatten)]
    shared: SharedArgs,
}

/// Main method for the `amrsum summarize` subcommand.
pub fn summarize(args: SummarizeArgs) -> anyhow::Result<()> {
    info!("Starting summarize command...");
    debug!("  [*] Source: {}", args.src.display());

    let config = args.shared.load_config()?;
    let output_directory = output_directory(args.output_directory)?;

    let written = run(
        &args.src,
        &output_directory,
        &config,
        args.shared.unclassifiable(),
        args.shared.unrecognized(),
    )?;

    for path in written {
        info!("  [*] Wrote {}.", path.display());
    }

    info!("Finished summary.");
    Ok(())
}

/// Writes the overview and the full comparison of the samples under `src`
/// into `output_directory`. Returns the workbooks written.
pub fn run(
    src: &Path,
    output_directory: &Path,
    config: &Config,
    unclassifiable: Unclassifiable,
    unrecognized: Unrecognized,
) -> anyhow::Result<Vec<PathBuf>> {
    // (1) Index the samples once.
    let index = SampleIndex::from_dir(src, unclassifiable)
        .with_context(|| format!("indexing samples: {}", src.display()))?;

    // (2) Overview.
    let overview = build_overview(&index);
    let overview_path = output_directory.join(OVERVIEW_FILE);
    write_workbook(&overview_path, &[Sheet::new(OVERVIEW_SHEET, &overview)])
        .with_context(|| format!("writing workbook: {}", overview_path.display()))?;

    // (3) Comparisons over every file, sharing one extraction.
    let genes = Comparator::new(&index, config, unrecognized)
        .gene_matrix(None)
        .context("building comparison")?;
    let all = apply(genes.clone(), &ComparisonOptions::all(), config);
    let all_binary = apply(genes, &ComparisonOptions::all_binary(), config);

    let comparison_path = output_directory.join(COMPARISON_FILE);
    write_workbook(
        &comparison_path,
        &[
            Sheet::new("all", &all),
            Sheet::new("all_binary", &all_binary),
        ],
    )
    .with_context(|| format!("writing workbook: {}", comparison_path.display()))?;

    Ok(vec![overview_path, comparison_path])
}
