//! Extraction of gene identity scores from per-sample result files.
//!
//! # Overview
//!
//! Every AMR and typing tool writes its results in a slightly different
//! tabular layout. Extraction happens in three steps:
//!
//! 1. The delimiter is sniffed from the top of the file ([`sniff`]).
//! 2. The file is read into a [`Table`], skipping malformed rows.
//! 3. The first [`Dialect`](dialect::Dialect) whose columns are all present
//!    in the header decides which column holds the gene and which holds (or
//!    implies) the score ([`dialect`]). A header with a `Locus` column is only
//!    matched against the `Locus` dialects.
//!
//! The result is an ordered gene → [`Score`] map. When a gene appears on
//! several rows, the last row wins.

pub mod dialect;
pub mod sniff;

use std::path::Path;
use std::path::PathBuf;

use indexmap::IndexMap;
use tracing::debug;

use crate::config::Config;
use crate::errors::Error;
use crate::errors::Result;

/// Categorical quality reported by dialects that do not state an identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualityFlag {
    /// Quality control passed.
    Passed,

    /// Quality control failed.
    Failed,
}

/// The score reported for a single gene.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Score {
    /// Percentage identity to the reference sequence.
    Identity(f64),

    /// A categorical quality flag, scored with the configured sentinels.
    Quality(QualityFlag),

    /// The gene was listed but its identity is not a number (`NA`, for
    /// example). Scored like an absent gene.
    Missing,
}

impl Score {
    /// The numeric value of this score.
    pub fn value(&self, config: &Config) -> f64 {
        match self {
            Score::Identity(v) => *v,
            Score::Quality(QualityFlag::Passed) => config.quality_passed,
            Score::Quality(QualityFlag::Failed) => config.quality_failed,
            Score::Missing => config.missing_value,
        }
    }
}

/// Genes found in a single file, in the order they were first seen.
pub type GeneScores = IndexMap<String, Score>;

/// A delimited text file held in memory.
#[derive(Debug)]
pub struct Table {
    file: PathBuf,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Reads the file at `path`, sniffing its delimiter first. Rows with a
    /// different number of fields than the header, and rows that cannot be
    /// decoded, are dropped.
    pub fn read(path: &Path, config: &Config) -> Result<Table> {
        let delimiter = sniff::delimiter_for(path, config);
        debug!(
            "  [*] Reading {} with delimiter {:?}.",
            path.display(),
            delimiter as char
        );

        // Tab-separated tool output is not quoted, and some tools write a
        // stray leading quote into the header that has to survive as-is.
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .quoting(delimiter != b'\t')
            .from_path(path)?;

        let columns: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(i, h)| match i {
                0 => h.trim_start_matches('\u{feff}').to_string(),
                _ => h.to_string(),
            })
            .collect();

        let mut rows = Vec::new();
        let mut skipped = 0usize;
        for result in reader.records() {
            match result {
                Ok(record) if record.len() == columns.len() => {
                    rows.push(record.iter().map(String::from).collect());
                }
                _ => skipped += 1,
            }
        }

        if skipped > 0 {
            debug!(
                "  [*] Skipped {} malformed rows in {}.",
                skipped,
                path.display()
            );
        }

        Ok(Table {
            file: path.to_path_buf(),
            columns,
            rows,
        })
    }

    /// Builds a table directly from its parts.
    pub fn new(file: impl Into<PathBuf>, columns: Vec<String>, rows: Vec<Vec<String>>) -> Table {
        Table {
            file: file.into(),
            columns,
            rows,
        }
    }

    /// The file this table was read from.
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Column names, in header order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Whether the header contains a column with exactly this name.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Position of the first column with this name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// All data rows.
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }
}

/// Extracts the gene → score mapping from the file at `path`.
pub fn extract_genes(path: &Path, config: &Config) -> Result<GeneScores> {
    let table = Table::read(path, config)?;
    extract_from_table(&table)
}

/// Extracts the gene → score mapping from an already loaded table.
pub fn extract_from_table(table: &Table) -> Result<GeneScores> {
    let dialect = dialect::detect(table)?;

    debug!(
        "  [*] {} matched the `{}` dialect.",
        table.file().display(),
        dialect.name
    );
    dialect.extract(table)
}

/// Parses an identity cell, accepting surrounding whitespace and a trailing
/// percent sign.
///
/// ```
/// use amrsum::extract::parse_identity;
///
/// assert_eq!(parse_identity("99.5"), Some(99.5));
/// assert_eq!(parse_identity(" 100.00% "), Some(100.0));
/// assert_eq!(parse_identity("NA"), None);
/// ```
pub fn parse_identity(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    let cell = cell.strip_suffix('%').unwrap_or(cell).trim_end();
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_quality_scores_use_sentinels() {
        let config = Config {
            quality_passed: 77.0,
            quality_failed: 3.0,
            ..Default::default()
        };

        assert_eq!(Score::Identity(95.2).value(&config), 95.2);
        assert_eq!(Score::Quality(QualityFlag::Passed).value(&config), 77.0);
        assert_eq!(Score::Quality(QualityFlag::Failed).value(&config), 3.0);
        assert_eq!(Score::Missing.value(&config), config.missing_value);
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A_1_resfinder.tsv");
        fs::write(
            &path,
            "Locus\t% Identity\ngeneX\t95.2\nbroken\ngeneY\t88.0\textra\ngeneZ\t99.0\n",
        )
        .unwrap();

        let table = Table::read(&path, &Config::default()).unwrap();
        assert_eq!(table.columns(), ["Locus", "% Identity"]);
        assert_eq!(table.rows().len(), 2);

        let genes = extract_genes(&path, &Config::default()).unwrap();
        assert_eq!(genes.keys().collect::<Vec<_>>(), ["geneX", "geneZ"]);
    }

    #[test]
    fn test_comma_separated_file_is_sniffed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A_1_amrfinder.csv");
        fs::write(
            &path,
            "Gene symbol,% Identity to reference sequence\nblaTEM-1,100.00\n\"aac(3)-IId\",98.50\n",
        )
        .unwrap();

        let genes = extract_genes(&path, &Config::default()).unwrap();
        assert_eq!(genes["blaTEM-1"], Score::Identity(100.0));
        assert_eq!(genes["aac(3)-IId"], Score::Identity(98.5));
    }

    #[test]
    fn test_byte_order_mark_is_dropped_from_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A_1_allele.tsv");
        fs::write(&path, "\u{feff}Allele\t% Identity\nstx2a\t99.1\n").unwrap();

        let genes = extract_genes(&path, &Config::default()).unwrap();
        assert_eq!(genes["stx2a"], Score::Identity(99.1));
    }

    #[test]
    fn test_unrecognized_schema_names_file_and_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A_1_weird.tsv");
        fs::write(&path, "foo\tbar\n1\t2\n").unwrap();

        match extract_genes(&path, &Config::default()).unwrap_err() {
            Error::UnrecognizedSchema { file, columns } => {
                assert_eq!(file, path);
                assert_eq!(columns, ["foo", "bar"]);
            }
            e => panic!("unexpected error: {}", e),
        }
    }

    #[test]
    fn test_locus_file_without_a_locus_score_is_unrecognized() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A_1_resfinder.tsv");
        fs::write(&path, "Locus\tGene\t%Identity\ngeneA\tgeneB\t99.0\n").unwrap();

        assert!(matches!(
            extract_genes(&path, &Config::default()),
            Err(Error::UnrecognizedSchema { .. })
        ));
    }

    #[test]
    fn test_non_numeric_identity_keeps_the_gene() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("A_1_mlst.tsv");
        fs::write(&path, "Gene\t%Identity\ngeneA\tNA\ngeneB\t99\n").unwrap();

        let genes = extract_genes(&path, &Config::default()).unwrap();
        assert_eq!(genes.keys().collect::<Vec<_>>(), ["geneA", "geneB"]);
        assert_eq!(genes["geneA"], Score::Missing);
        assert_eq!(genes["geneB"], Score::Identity(99.0));
    }
}
