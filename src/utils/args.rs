//! Utilities related to the parsing of arguments.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::debug;

use crate::compare::Unrecognized;
use crate::config::Config;
use crate::organise::index::Unclassifiable;

/// Utility method to parse the identity cutoff passed in on the command line
/// and ensure the cutoff is within the range [0.0, 100.0].
pub fn cutoff_in_range(cutoff_raw: &str) -> Result<f64, String> {
    let cutoff: f64 = cutoff_raw
        .parse()
        .map_err(|_| format!("{} isn't a float", cutoff_raw))?;

    match (0.0..=100.0).contains(&cutoff) {
        true => Ok(cutoff),
        false => Err(String::from(
            "Identity cutoff must be between 0.0 and 100.0",
        )),
    }
}

//=============//
// Shared args //
//=============//

/// Arguments accepted by every subcommand that reads sample results.
#[derive(Args, Clone, Debug, Default)]
pub struct SharedArgs {
    /// A TOML file overriding the default configuration.
    #[arg(long, value_name = "TOML", env = "AMRSUM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Identity cutoff (percent) at or above which a gene counts as present.
    #[arg(long, value_name = "F64", value_parser = cutoff_in_range)]
    pub cutoff: Option<f64>,

    /// Skip files whose name cannot be split into a sample name and type
    /// instead of failing.
    #[arg(long)]
    pub skip_malformed: bool,

    /// Skip files whose columns match no known result format instead of
    /// failing.
    #[arg(long)]
    pub skip_unrecognized: bool,
}

impl SharedArgs {
    /// Loads the configuration and applies the command line overrides.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref()).with_context(|| {
            match &self.config {
                Some(p) => format!("loading configuration: {}", p.display()),
                None => String::from("loading the default configuration"),
            }
        })?;

        if let Some(cutoff) = self.cutoff {
            debug!("  [*] Identity cutoff overridden: {}", cutoff);
            config.identity_cutoff = cutoff;
        }

        Ok(config)
    }

    /// What to do with files that cannot be classified.
    pub fn unclassifiable(&self) -> Unclassifiable {
        match self.skip_malformed {
            true => Unclassifiable::Skip,
            false => Unclassifiable::Fail,
        }
    }

    /// What to do with files in no known result format.
    pub fn unrecognized(&self) -> Unrecognized {
        match self.skip_unrecognized {
            true => Unrecognized::Skip,
            false => Unrecognized::Fail,
        }
    }
}

//==================//
// Output directory //
//==================//

/// Resolves the output directory, defaulting to the current working
/// directory, and makes sure it exists.
pub fn output_directory(requested: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let directory = match requested {
        Some(o) => o,
        None => std::env::current_dir()
            .context("could not retrieve the current working directory")?,
    };

    debug!("  [*] Output directory: {}", directory.display());
    std::fs::create_dir_all(&directory)
        .with_context(|| format!("creating output directory: {}", directory.display()))?;

    Ok(directory)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_cutoff_in_range() {
        assert_eq!(cutoff_in_range("90"), Ok(90.0));
        assert_eq!(cutoff_in_range("0.0"), Ok(0.0));
        assert_eq!(cutoff_in_range("100"), Ok(100.0));
        assert!(cutoff_in_range("100.5").is_err());
        assert!(cutoff_in_range("-1").is_err());
        assert!(cutoff_in_range("ninety").is_err());
    }

    #[test]
    fn test_cutoff_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("amrsum.toml");
        fs::write(&path, "identity_cutoff = 80.0\nmissing_value = -1.0\n").unwrap();

        let args = SharedArgs {
            config: Some(path),
            cutoff: Some(95.0),
            ..Default::default()
        };
        let config = args.load_config().unwrap();
        assert_eq!(config.identity_cutoff, 95.0);
        assert_eq!(config.missing_value, -1.0);
    }

    #[test]
    fn test_policies() {
        let args = SharedArgs {
            skip_malformed: true,
            ..Default::default()
        };
        assert_eq!(args.unclassifiable(), Unclassifiable::Skip);
        assert_eq!(args.unrecognized(), Unrecognized::Fail);
    }

    #[test]
    fn test_output_directory_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("a/b");
        let resolved = output_directory(Some(out.clone())).unwrap();
        assert_eq!(resolved, out);
        assert!(out.is_dir());
    }
}
