//! Process-wide configuration.
//!
//! # Overview
//!
//! Every value that used to be a global default (the identity cutoff, the
//! quality sentinels, the gene denylist, the pipeline tool settings) lives in
//! a single [`Config`]. It is loaded once at startup, optionally from a TOML
//! file, has command line overrides applied, and is then handed to each
//! component by reference. Nothing reads configuration from ambient state.
//!
//! All fields have defaults, so a configuration file only needs to name the
//! values it changes:
//!
//! ```
//! use amrsum::config::Config;
//!
//! let config: Config = toml::from_str("identity_cutoff = 95.0").unwrap();
//! assert_eq!(config.identity_cutoff, 95.0);
//! assert_eq!(config.quality_passed, 100.0);
//! assert_eq!(config.pipeline.tool_id, "pipeline_stec_1.0");
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;

use crate::errors::Error;
use crate::errors::Result;

/// Top-level configuration shared by every subcommand.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Identity percentage at or above which a gene counts as present when
    /// binarizing a comparison.
    pub identity_cutoff: f64,

    /// Score assigned to genes reported by a dialect that only states that
    /// quality control passed.
    pub quality_passed: f64,

    /// Score assigned to genes reported by a dialect that states that quality
    /// control failed.
    pub quality_failed: f64,

    /// Value for a gene that was not observed in a file.
    pub missing_value: f64,

    /// Gene identifiers that are never reported in a comparison.
    pub genes_to_filter: Vec<String>,

    /// Number of bytes read from the top of a file when sniffing its
    /// delimiter.
    pub sniff_bytes: usize,

    /// Delimiter used when sniffing is inconclusive.
    pub default_delimiter: char,

    /// Settings for the remote pipeline submission.
    pub pipeline: PipelineConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            identity_cutoff: 90.0,
            quality_passed: 100.0,
            quality_failed: 0.0,
            missing_value: 0.0,
            genes_to_filter: Vec::new(),
            sniff_bytes: 5000,
            default_delimiter: '\t',
            pipeline: PipelineConfig::default(),
        }
    }
}

impl Config {
    /// Reads a [`Config`] from a TOML file. Missing keys keep their defaults.
    pub fn read(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;

        toml::from_str(&contents).map_err(|e| Error::Config {
            file: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Loads the configuration file if one was given, otherwise the defaults.
    pub fn load(path: Option<&Path>) -> Result<Config> {
        match path {
            Some(p) => Config::read(p),
            None => Ok(Config::default()),
        }
    }

    /// The default delimiter as a byte, as expected by the `csv` reader.
    /// Non-ASCII delimiters fall back to a tab.
    pub fn default_delimiter_byte(&self) -> u8 {
        if self.default_delimiter.is_ascii() {
            self.default_delimiter as u8
        } else {
            b'\t'
        }
    }
}

/// Settings for `amrsum submit`.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Identifier of the tool to run on the remote service.
    pub tool_id: String,

    /// Seconds to wait between two job status requests.
    pub poll_interval_secs: u64,

    /// Seconds after which polling gives up.
    pub timeout_secs: u64,

    /// AMR databases the pipeline should search.
    pub amr_databases: Vec<String>,

    /// MLST schemes the pipeline should type against.
    pub mlst_schemes: Vec<String>,

    /// Alignment method used for gene detection.
    pub detection_method: String,

    /// Sequencing library preparation kit.
    pub library: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            tool_id: String::from("pipeline_stec_1.0"),
            poll_interval_secs: 10,
            timeout_secs: 3600,
            amr_databases: ["resfinder", "argannot", "card", "ncbi-amr", "pointfinder"]
                .into_iter()
                .map(String::from)
                .collect(),
            mlst_schemes: ["mlst-pasteur", "mlst-warwick", "cgmlst"]
                .into_iter()
                .map(String::from)
                .collect(),
            detection_method: String::from("blast"),
            library: String::from("NexteraPE"),
        }
    }
}

impl PipelineConfig {
    /// Interval between two status requests.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Upper bound on the total time spent polling one job.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_round_trip_through_empty_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.identity_cutoff, 90.0);
        assert_eq!(config.missing_value, 0.0);
        assert_eq!(config.default_delimiter, '\t');
        assert_eq!(config.pipeline.poll_interval(), Duration::from_secs(10));
        assert_eq!(config.pipeline.amr_databases.len(), 5);
    }

    #[test]
    fn test_read_partial_pipeline_table() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "genes_to_filter = [\"blaEC\"]\n\n[pipeline]\ntimeout_secs = 60"
        )
        .unwrap();

        let config = Config::read(file.path()).unwrap();
        assert_eq!(config.genes_to_filter, vec![String::from("blaEC")]);
        assert_eq!(config.pipeline.timeout(), Duration::from_secs(60));
        assert_eq!(config.pipeline.library, "NexteraPE");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "identity_cutof = 80.0").unwrap();

        let err = Config::read(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }
}
