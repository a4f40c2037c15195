//! Functionality related to the `amrsum compare` command itself.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::debug;
use tracing::info;

use crate::compare::Comparator;
use crate::compare::ComparisonOptions;
use crate::organise::SampleIndex;
use crate::report::write_workbook;
use crate::report::Sheet;
use crate::utils::args::output_directory;
use crate::utils::args::SharedArgs;

/// Command line arguments for `amrsum compare`.
#[derive(Args)]
pub struct CompareArgs {
    /// Directory holding the per-sample result files.
    #[arg(value_name = "DIR")]
    src: PathBuf,

    /// Only compare files whose sample name or sample type contains this.
    #[arg(short, long, value_name = "STRING")]
    filter: Option<String>,

    /// Name of the worksheet.
    #[arg(long, value_name = "NAME", default_value = "comparison")]
    sheet: String,

    /// Turn identities into presence (1) or absence (0) using the cutoff.
    #[arg(long)]
    binary: bool,

    /// Reorder genes and files by hierarchical clustering.
    #[arg(long)]
    cluster: bool,

    /// Output the file × file correlation instead of the genes.
    #[arg(long)]
    corr: bool,

    /// Add a row with the sample type of each file.
    #[arg(long)]
    typing: bool,

    /// Remove a leading `(n)` cluster prefix from gene names.
    #[arg(long)]
    strip_cluster_prefix: bool,

    /// Sort files by name.
    #[arg(long)]
    sort_columns: bool,

    /// The directory to output the workbook to.
    #[arg(short, long, value_name = "PATH")]
    output_directory: Option<PathBuf>,

    /// File name of the workbook.
    #[arg(long, value_name = "FILE", default_value = "comparison.xlsx")]
    output_name: String,

    #[command(flatten)]
    shared: SharedArgs,
}

impl CompareArgs {
    fn options(&self) -> ComparisonOptions {
        ComparisonOptions {
            filter: self.filter.clone(),
            binary: self.binary,
            cluster: self.cluster,
            corr: self.corr,
            typing: self.typing,
            strip_cluster_prefix: self.strip_cluster_prefix,
            sort_columns: self.sort_columns,
        }
    }
}

/// Main method for the `amrsum compare` subcommand.
pub fn compare(args: CompareArgs) -> anyhow::Result<()> {
    info!("Starting compare command...");
    debug!("  [*] Source: {}", args.src.display());

    let config = args.shared.load_config()?;
    let options = args.options();
    debug!("  [*] Options: {:?}", options);

    // (1) Index the samples.
    let index = SampleIndex::from_dir(&args.src, args.shared.unclassifiable())
        .with_context(|| format!("indexing samples: {}", args.src.display()))?;

    // (2) Build the comparison.
    let comparator = Comparator::new(&index, &config, args.shared.unrecognized());
    let matrix = comparator
        .compare(&options)
        .context("building comparison")?;

    // (3) Write it out.
    let mut path = output_directory(args.output_directory)?;
    path.push(&args.output_name);
    write_workbook(&path, &[Sheet::new(&args.sheet, &matrix)])
        .with_context(|| format!("writing workbook: {}", path.display()))?;

    info!("Finished comparison.");
    Ok(())
}
