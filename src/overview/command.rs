//! Functionality related to the `amrsum overview` command itself.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use prettytable::Cell;
use prettytable::Row;
use prettytable::Table;
use tracing::debug;
use tracing::info;

use crate::matrix::Matrix;
use crate::organise::SampleIndex;
use crate::organise::TypeGroups;
use crate::overview::build_overview;
use crate::report::write_workbook;
use crate::report::Sheet;
use crate::utils::args::output_directory;
use crate::utils::args::SharedArgs;

/// File name of the overview workbook.
pub const OVERVIEW_FILE: &str = "overview_samples.xlsx";

/// Sheet name of the overview.
pub const OVERVIEW_SHEET: &str = "overview samples";

/// Command line arguments for `amrsum overview`.
#[derive(Args)]
pub struct OverviewArgs {
    /// Directory holding the per-sample result files.
    #[arg(value_name = "DIR")]
    src: PathBuf,

    /// The directory to output the workbook to.
    #[arg(short, long, value_name = "PATH")]
    output_directory: Option<PathBuf>,

    /// Also print the overview and the type groups.
    #[arg(short, long)]
    print: bool,

    #[command(flatten)]
    shared: SharedArgs,
}

/// Main method for the `amrsum overview` subcommand.
pub fn overview(args: OverviewArgs) -> anyhow::Result<()> {
    info!("Starting overview command...");
    debug!("  [*] Source: {}", args.src.display());

    let index = SampleIndex::from_dir(&args.src, args.shared.unclassifiable())
        .with_context(|| format!("indexing samples: {}", args.src.display()))?;
    let overview = build_overview(&index);

    let mut path = output_directory(args.output_directory)?;
    path.push(OVERVIEW_FILE);
    write_workbook(&path, &[Sheet::new(OVERVIEW_SHEET, &overview)])
        .with_context(|| format!("writing workbook: {}", path.display()))?;

    if args.print {
        matrix_table(&overview).printstd();
        println!();
        type_groups_table(&index.type_groups()).printstd();
    }

    info!("Finished overview.");
    Ok(())
}

/// Renders a matrix as a table, numbers without decimals.
pub fn matrix_table(matrix: &Matrix) -> Table {
    let mut table = Table::new();

    let mut header = vec![Cell::new("")];
    header.extend(matrix.column_labels().iter().map(|c| Cell::new(c)));
    table.add_row(Row::new(header));

    for (i, label) in matrix.row_labels().iter().enumerate() {
        let mut cells = vec![Cell::new(label)];
        cells.extend(
            matrix
                .row(i)
                .iter()
                .map(|v| Cell::new(&format!("{:.0}", v))),
        );
        table.add_row(Row::new(cells));
    }

    table
}

/// Renders the base types and their subtypes as a table.
pub fn type_groups_table(groups: &TypeGroups) -> Table {
    let mut table = Table::new();
    table.add_row(Row::new(vec![Cell::new("Type"), Cell::new("Subtypes")]));

    for base in &groups.types {
        let subtypes = match groups.subtypes.get(base) {
            Some(s) => s.join(", "),
            None => String::new(),
        };
        table.add_row(Row::new(vec![Cell::new(base), Cell::new(&subtypes)]));
    }

    table
}
