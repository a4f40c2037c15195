//! Functionality related to the `amrsum submit` command itself.

use std::path::PathBuf;

use anyhow::bail;
use anyhow::Context;
use clap::Args;
use num_format::Locale;
use num_format::ToFormattedString;
use prettytable::row;
use prettytable::Table;
use tracing::debug;
use tracing::info;

use super::galaxy::GalaxyClient;
use super::inputs::ToolInputs;
use super::pairing;
use super::run_sample;
use super::DatasetId;
use crate::config::Config;

/// Command line arguments for `amrsum submit`.
#[derive(Args)]
pub struct SubmitArgs {
    /// Directory holding the paired read files, named `<sample>_<read>.*`.
    #[arg(value_name = "DIR")]
    src: PathBuf,

    /// Base URL of the Galaxy instance.
    #[arg(long, value_name = "URL", required_unless_present = "dry_run")]
    url: Option<String>,

    /// API key of the Galaxy user.
    #[arg(
        long,
        value_name = "KEY",
        env = "GALAXY_API_KEY",
        hide_env_values = true,
        required_unless_present = "dry_run"
    )]
    api_key: Option<String>,

    /// Print the read pairs and the parameters that would be sent, without
    /// contacting the service.
    #[arg(long)]
    dry_run: bool,

    /// Delete each session once its run is over, including failed runs.
    #[arg(long)]
    purge: bool,

    /// A TOML file overriding the default configuration.
    #[arg(long, value_name = "TOML", env = "AMRSUM_CONFIG")]
    config: Option<PathBuf>,
}

/// Main method for the `amrsum submit` subcommand.
pub fn submit(args: SubmitArgs) -> anyhow::Result<()> {
    info!("Starting submit command...");
    debug!("  [*] Source: {}", args.src.display());

    let config = Config::load(args.config.as_deref()).context("loading configuration")?;

    // (1) Pair the reads.
    let files = pairing::read_files(&args.src)
        .with_context(|| format!("listing reads: {}", args.src.display()))?;
    let pairs = pairing::pair_reads(files).context("pairing reads")?;
    info!(
        "  [*] Found {} sample(s).",
        pairs.len().to_formatted_string(&Locale::en)
    );

    // (2) Either show what would happen...
    if args.dry_run {
        let mut table = Table::new();
        table.add_row(row!["Sample", "Read 1", "Read 2"]);
        for pair in &pairs {
            table.add_row(row![
                pair.sample,
                pair.read_1.display(),
                pair.read_2.display()
            ]);
        }
        table.printstd();

        for pair in &pairs {
            let inputs = ToolInputs::new(
                &config.pipeline,
                &pair.sample,
                &DatasetId::from("<read 1>"),
                &DatasetId::from("<read 2>"),
            );
            println!();
            println!("{} ({}):", pair.sample, config.pipeline.tool_id);
            println!(
                "{}",
                serde_json::to_string_pretty(&inputs).context("serializing tool inputs")?
            );
        }

        return Ok(());
    }

    // (3) ...or run every sample.
    let (url, api_key) = match (args.url, args.api_key) {
        (Some(url), Some(api_key)) => (url, api_key),
        _ => bail!("--url and --api-key are required unless --dry-run is given"),
    };
    let client = GalaxyClient::new(&url, &api_key).context("creating Galaxy client")?;

    for pair in &pairs {
        info!("  [*] Running {}.", pair.sample);
        let submission = run_sample(&client, &config.pipeline, pair, args.purge)
            .with_context(|| format!("running sample {}", pair.sample))?;
        debug!(
            "  [*] Sample {} finished as job {}.",
            pair.sample, submission.job
        );
    }

    info!("Finished submitting.");
    Ok(())
}
