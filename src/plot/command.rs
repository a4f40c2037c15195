//! Functionality related to the `amrsum plot` command itself.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use clap::Subcommand;
use tracing::debug;
use tracing::info;

use crate::config::Config;
use crate::organise::index::Unclassifiable;
use crate::utils::args::output_directory;
use crate::utils::args::SharedArgs;

use super::overview::SampleOverviewPlot;
use super::workflow::WorkflowComparisonPlot;

//===============//
// Command setup //
//===============//

/// Command line arguments for `amrsum plot`.
#[derive(Args)]
pub struct PlotArgs {
    /// The subcommand for `amrsum plot`.
    #[command(subcommand)]
    pub subcommand: PlotSubcommand,
}

/// All possible subcommands for `amrsum plot`.
#[derive(Subcommand)]
pub enum PlotSubcommand {
    /// Plots the agreement between workflows per AMR gene from a CSV with
    /// `AMR`, `WF` and `Value` columns.
    Workflow(PlotFigureArgs),

    /// Plots which sample has results of which type.
    Overview(PlotFigureArgs),
}

/// Arguments shared by every `amrsum plot` subcommand.
#[derive(Args)]
pub struct PlotFigureArgs {
    /// Input for the plot: a CSV file for `workflow`, a sample directory for
    /// `overview`.
    #[arg(value_name = "PATH")]
    pub src: PathBuf,

    /// The directory to output all files within.
    #[arg(short, long, value_name = "PATH")]
    pub output_directory: Option<PathBuf>,

    /// Configuration and skip options, as for the other sample commands.
    #[command(flatten)]
    pub shared: SharedArgs,
}

/// Everything a [`Figure`] needs to load its data.
pub struct FigureSource {
    /// The file or directory holding the data.
    pub path: PathBuf,

    /// The loaded configuration.
    pub config: Config,

    /// What to do with files that cannot be classified.
    pub unclassifiable: Unclassifiable,
}

//==============//
// Figure trait //
//==============//

/// A figure that can be rendered by `amrsum plot`.
pub trait Figure {
    /// The name of this figure.
    fn name(&self) -> &'static str;

    /// A short description of what this figure shows.
    fn description(&self) -> &'static str;

    /// The filename (without extension) to output for this figure.
    fn filename(&self) -> &'static str;

    /// Generates the figure from its source data.
    fn generate(&self, source: &FigureSource) -> anyhow::Result<plotly::Plot>;
}

/// Gets all of the supported figures.
pub fn get_all_figures() -> Vec<Box<dyn Figure>> {
    vec![
        Box::new(WorkflowComparisonPlot),
        Box::new(SampleOverviewPlot),
    ]
}

//==============//
// Main command //
//==============//

/// Main method for the `amrsum plot` subcommand.
pub fn plot(args: PlotArgs) -> anyhow::Result<()> {
    let (figure, args): (Box<dyn Figure>, PlotFigureArgs) = match args.subcommand {
        PlotSubcommand::Workflow(a) => (Box::new(WorkflowComparisonPlot), a),
        PlotSubcommand::Overview(a) => (Box::new(SampleOverviewPlot), a),
    };

    //========//
    // Source //
    //========//

    debug!("  [*] Source: {}", args.src.display());
    let source = FigureSource {
        path: args.src,
        config: args.shared.load_config()?,
        unclassifiable: args.shared.unclassifiable(),
    };

    //==================//
    // Output Directory //
    //==================//

    let output_directory = output_directory(args.output_directory)?;

    //===============//
    // Generate plot //
    //===============//

    let plot = figure
        .generate(&source)
        .with_context(|| format!("generating {}", figure.name()))?;

    let mut filename = output_directory;
    filename.push(String::from(figure.filename()) + ".html");

    info!("  [*] Writing {} to {}", figure.name(), filename.display());
    plot.write_html(filename);

    Ok(())
}
