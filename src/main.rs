use clap::Parser;
use clap::Subcommand;
use git_testament::git_testament;
use git_testament::render_testament;
use tracing::debug;

use amrsum::compare;
use amrsum::errors;
use amrsum::list;
use amrsum::overview;
use amrsum::pipeline;
use amrsum::plot;
use amrsum::summarize;

git_testament!(TESTAMENT);

#[derive(Parser)]
#[command(author, version = render_testament!(TESTAMENT), propagate_version = true, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Only errors are printed to the stderr stream.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// All available information, including debug information, is printed to
    /// stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Writes the sample overview and the full comparison workbooks.
    Summarize(summarize::command::SummarizeArgs),

    /// Writes a single, customised comparison workbook.
    Compare(compare::command::CompareArgs),

    /// Writes (and optionally prints) the sample overview.
    Overview(overview::command::OverviewArgs),

    /// Renders figures to HTML.
    Plot(plot::command::PlotArgs),

    /// Submits paired reads to a Galaxy pipeline.
    Submit(pipeline::command::SubmitArgs),

    /// Lists supported dialects, figures or the effective configuration.
    List(list::command::ListArgs),
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else if cli.quiet {
        tracing::Level::ERROR
    } else {
        tracing::Level::INFO
    };

    let subscriber = tracing_subscriber::fmt::Subscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    debug!("amrsum {}", render_testament!(TESTAMENT));

    let result = match cli.command {
        Commands::Summarize(args) => summarize::command::summarize(args),
        Commands::Compare(args) => compare::command::compare(args),
        Commands::Overview(args) => overview::command::overview(args),
        Commands::Plot(args) => plot::command::plot(args),
        Commands::Submit(args) => pipeline::command::submit(args),
        Commands::List(args) => list::command::list(args),
    };

    if let Err(err) = result {
        errors::exit(format!("{:#}", err), errors::ExitCode::InvalidInputData);
    }
}
