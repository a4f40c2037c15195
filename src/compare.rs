//! Assembly of gene × file comparison matrices.

pub mod command;

use std::collections::BTreeSet;

use num_format::Locale;
use num_format::ToFormattedString;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::config::Config;
use crate::errors::Error;
use crate::errors::Result;
use crate::extract::extract_genes;
use crate::extract::GeneScores;
use crate::matrix::Matrix;
use crate::organise::SampleFile;
use crate::organise::SampleIndex;

/// Row label produced by tools that report "no hit" as a gene named `-`.
pub const PLACEHOLDER_GENE: &str = "-";

/// What to do with a file that matches none of the known dialects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Unrecognized {
    /// Abort with the dialect error.
    #[default]
    Fail,

    /// Log a warning and leave the file out of the comparison.
    Skip,
}

/// Options for a single comparison sheet. Every transform is independent;
/// enabled transforms run in the order the fields are declared.
#[derive(Clone, Debug, Default)]
pub struct ComparisonOptions {
    /// Only include files whose sample name or sample type contains this.
    pub filter: Option<String>,

    /// Turn identities into presence (1) or absence (0) using the cutoff.
    pub binary: bool,

    /// Reorder rows and columns by hierarchical clustering.
    pub cluster: bool,

    /// Replace the matrix by its column × column correlation.
    pub corr: bool,

    /// Add a row holding the sample type of each column.
    pub typing: bool,

    /// Remove a leading `(n)` cluster prefix from row labels.
    pub strip_cluster_prefix: bool,

    /// Sort columns by name.
    pub sort_columns: bool,
}

impl ComparisonOptions {
    /// Clustered identities of every file, annotated with sample types.
    pub fn all() -> Self {
        ComparisonOptions {
            cluster: true,
            typing: true,
            ..Default::default()
        }
    }

    /// Like [`ComparisonOptions::all`], but binarized.
    pub fn all_binary() -> Self {
        ComparisonOptions {
            binary: true,
            ..ComparisonOptions::all()
        }
    }
}

/// Builds comparison matrices from a [`SampleIndex`].
pub struct Comparator<'a> {
    index: &'a SampleIndex,
    config: &'a Config,
    unrecognized: Unrecognized,
}

impl<'a> Comparator<'a> {
    /// Creates a new [`Comparator`].
    pub fn new(index: &'a SampleIndex, config: &'a Config, unrecognized: Unrecognized) -> Self {
        Comparator {
            index,
            config,
            unrecognized,
        }
    }

    /// Builds the comparison described by `options`.
    pub fn compare(&self, options: &ComparisonOptions) -> Result<Matrix> {
        let matrix = self.gene_matrix(options.filter.as_deref())?;
        Ok(apply(matrix, options, self.config))
    }

    /// Builds the untransformed gene × file matrix for the files selected by
    /// `filter`.
    ///
    /// Rows are the union of genes across the selected files (minus the
    /// configured denylist and the `-` placeholder), sorted. Columns are the
    /// file names, ordered by sample name and then sample type. Genes a file
    /// does not report hold the configured missing value.
    pub fn gene_matrix(&self, filter: Option<&str>) -> Result<Matrix> {
        let extracted = self.extract_selected(filter)?;

        let genes: BTreeSet<&str> = extracted
            .iter()
            .flat_map(|(_, scores)| scores.keys().map(String::as_str))
            .filter(|g| !self.config.genes_to_filter.iter().any(|f| f == g))
            .collect();

        let rows: Vec<String> = genes.iter().map(|g| g.to_string()).collect();
        let columns: Vec<String> = extracted
            .iter()
            .map(|(file, _)| file.file_name().to_string())
            .collect();

        let mut matrix = Matrix::filled(rows, columns, self.config.missing_value);
        for (j, (_, scores)) in extracted.iter().enumerate() {
            for (i, gene) in genes.iter().enumerate() {
                if let Some(score) = scores.get(*gene) {
                    matrix.set(i, j, score.value(self.config));
                }
            }
        }

        info!(
            "  [*] Assembled {} genes across {} files.",
            matrix.n_rows().to_formatted_string(&Locale::en),
            matrix.n_columns().to_formatted_string(&Locale::en),
        );

        Ok(matrix.drop_row(PLACEHOLDER_GENE))
    }

    fn extract_selected(&self, filter: Option<&str>) -> Result<Vec<(&'a SampleFile, GeneScores)>> {
        let selected = self.index.select(filter);
        debug!(
            "  [*] Selected {} files with filter {:?}.",
            selected.len(),
            filter
        );

        let mut extracted = Vec::with_capacity(selected.len());
        for file in selected {
            match extract_genes(file.path(), self.config) {
                Ok(scores) => extracted.push((file, scores)),
                Err(e @ Error::UnrecognizedSchema { .. })
                    if self.unrecognized == Unrecognized::Skip =>
                {
                    warn!("  [*] Skipping {}: {}", file.path().display(), e);
                }
                Err(e) => return Err(e),
            }
        }

        Ok(extracted)
    }
}

/// Applies the transforms selected in `options`, in order: binarize, cluster,
/// correlate, annotate types, strip cluster prefixes, sort columns.
pub fn apply(matrix: Matrix, options: &ComparisonOptions, config: &Config) -> Matrix {
    let mut matrix = matrix;

    if options.binary {
        matrix = matrix.binarize(config.identity_cutoff);
    }

    if options.cluster {
        matrix = matrix.cluster();
    }

    if options.corr {
        matrix = matrix.correlation();
    }

    if options.typing {
        matrix = matrix.with_type_row();
    }

    if options.strip_cluster_prefix {
        matrix = matrix.strip_row_prefixes();
    }

    if options.sort_columns {
        matrix = matrix.sort_columns();
    }

    matrix
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use super::*;
    use crate::organise::index::Unclassifiable;

    fn write(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    fn fixture() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "A_1_resfinder.tsv",
            "Locus\t% Identity\ngeneX\t95.2\n-\t100\n",
        );
        write(dir.path(), "A_1_mlst.tsv", "Gene\t%Identity\ngeneY\t88.0\n");
        write(
            dir.path(),
            "B_2_resfinder.tsv",
            "Locus\t% Identity\ngeneX\t90.0\nblaEC\t99.0\n",
        );
        dir
    }

    #[test]
    fn test_gene_matrix_fills_missing_and_drops_placeholder() {
        let dir = fixture();
        let config = Config::default();
        let index = SampleIndex::from_dir(dir.path(), Unclassifiable::Fail).unwrap();
        let matrix = Comparator::new(&index, &config, Unrecognized::Fail)
            .gene_matrix(None)
            .unwrap();

        assert_eq!(matrix.row_labels(), ["blaEC", "geneX", "geneY"]);
        assert_eq!(
            matrix.column_labels(),
            ["A_1_mlst.tsv", "A_1_resfinder.tsv", "B_2_resfinder.tsv"]
        );
        assert_eq!(matrix.value("geneX", "A_1_resfinder.tsv"), Some(95.2));
        assert_eq!(matrix.value("geneX", "A_1_mlst.tsv"), Some(0.0));
        assert_eq!(matrix.value("blaEC", "B_2_resfinder.tsv"), Some(99.0));
    }

    #[test]
    fn test_denylist_and_filter() {
        let dir = fixture();
        let config = Config {
            genes_to_filter: vec![String::from("blaEC")],
            ..Default::default()
        };
        let index = SampleIndex::from_dir(dir.path(), Unclassifiable::Fail).unwrap();
        let matrix = Comparator::new(&index, &config, Unrecognized::Fail)
            .gene_matrix(Some("resfinder"))
            .unwrap();

        assert_eq!(matrix.row_labels(), ["geneX"]);
        assert_eq!(
            matrix.column_labels(),
            ["A_1_resfinder.tsv", "B_2_resfinder.tsv"]
        );
    }

    #[test]
    fn test_unrecognized_file_fails_or_is_skipped() {
        let dir = fixture();
        write(dir.path(), "B_2_notes.txt", "whatever\n");
        let config = Config::default();
        let index = SampleIndex::from_dir(dir.path(), Unclassifiable::Fail).unwrap();

        let err = Comparator::new(&index, &config, Unrecognized::Fail)
            .gene_matrix(None)
            .unwrap_err();
        assert!(matches!(err, Error::UnrecognizedSchema { .. }));

        let matrix = Comparator::new(&index, &config, Unrecognized::Skip)
            .gene_matrix(None)
            .unwrap();
        assert_eq!(matrix.n_columns(), 3);
    }

    #[test]
    fn test_options_compose_in_order() {
        let dir = fixture();
        let config = Config::default();
        let index = SampleIndex::from_dir(dir.path(), Unclassifiable::Fail).unwrap();
        let comparator = Comparator::new(&index, &config, Unrecognized::Fail);

        let binary = comparator.compare(&ComparisonOptions::all_binary()).unwrap();
        assert_eq!(binary.type_row().unwrap().len(), 3);
        assert_eq!(binary.value("geneX", "B_2_resfinder.tsv"), Some(1.0));
        assert_eq!(binary.value("geneY", "A_1_mlst.tsv"), Some(0.0));

        let corr = comparator
            .compare(&ComparisonOptions {
                corr: true,
                sort_columns: true,
                ..Default::default()
            })
            .unwrap();
        assert_eq!(corr.row_labels(), corr.column_labels());
        assert!(corr.type_row().is_none());
    }
}
