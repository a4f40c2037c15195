//! The known result file dialects and the order in which they are tried.
//!
//! Several dialects share incidental column names (a `Locus`/`ID` file may
//! also carry a `Gene` column, for example), so the order of [`DIALECTS`] is
//! significant: the first dialect whose required columns are all present
//! wins. Do not reorder the table.
//!
//! A header containing `Locus` is only tried against the dialects keyed on
//! `Locus`; if none of them matches, the file is unrecognized rather than
//! handed to a later dialect through one of its other columns.

use tracing::debug;

use super::parse_identity;
use super::GeneScores;
use super::QualityFlag;
use super::Score;
use super::Table;
use crate::errors::Error;
use crate::errors::Result;

/// Column holding the quality status in the genotype dialect.
const QUALITY_MODULE: &str = "Quality Module";

/// Gene column shared by the highest priority dialects.
const LOCUS: &str = "Locus";

/// Where the score of each gene comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScoreSource {
    /// The identity percentage in the named column.
    Column(&'static str),

    /// Every listed gene passed; there is no identity column.
    Passed,

    /// A single-row file listing comma-separated genes, scored by the
    /// `Quality Module` column.
    Genotype,
}

/// A result file layout, recognised by the presence of its columns.
#[derive(Debug)]
pub struct Dialect {
    /// Short name used in log messages and `amrsum list dialects`.
    pub name: &'static str,

    /// Columns that must all be present for this dialect to match.
    pub requires: &'static [&'static str],

    /// Column holding the gene identifiers.
    pub gene_column: &'static str,

    /// Where the scores come from.
    pub score: ScoreSource,
}

/// Every supported dialect in priority order.
pub const DIALECTS: &[Dialect] = &[
    Dialect {
        name: "locus-percent-identity",
        requires: &["Locus", "% Identity"],
        gene_column: "Locus",
        score: ScoreSource::Column("% Identity"),
    },
    Dialect {
        name: "locus-id",
        requires: &["Locus", "ID"],
        gene_column: "Locus",
        score: ScoreSource::Passed,
    },
    Dialect {
        name: "locus-identity",
        requires: &["Locus", "Identity"],
        gene_column: "Locus",
        score: ScoreSource::Column("Identity"),
    },
    Dialect {
        name: "quoted-locus",
        requires: &["\"Locus"],
        gene_column: "\"Locus",
        score: ScoreSource::Passed,
    },
    Dialect {
        name: "gene-symbol",
        requires: &["Gene symbol"],
        gene_column: "Gene symbol",
        score: ScoreSource::Column("% Identity to reference sequence"),
    },
    Dialect {
        name: "allele",
        requires: &["Allele"],
        gene_column: "Allele",
        score: ScoreSource::Column("% Identity"),
    },
    Dialect {
        name: "genotype",
        requires: &["Genotype"],
        gene_column: "Genotype",
        score: ScoreSource::Genotype,
    },
    Dialect {
        name: "best-hit-aro",
        requires: &["Best_Hit_ARO"],
        gene_column: "Best_Hit_ARO",
        score: ScoreSource::Column("Best_Identities"),
    },
    Dialect {
        name: "gene",
        requires: &["Gene"],
        gene_column: "Gene",
        score: ScoreSource::Column("%Identity"),
    },
];

/// Finds the first dialect whose required columns are all in `table`.
pub fn detect(table: &Table) -> Result<&'static Dialect> {
    let locus = table.has_column(LOCUS);

    DIALECTS
        .iter()
        .filter(|d| (d.gene_column == LOCUS) == locus)
        .find(|d| d.requires.iter().all(|c| table.has_column(c)))
        .ok_or_else(|| Error::UnrecognizedSchema {
            file: table.file().to_path_buf(),
            columns: table.columns().to_vec(),
        })
}

impl Dialect {
    /// Pulls the gene → score mapping out of `table` according to this
    /// dialect.
    pub fn extract(&self, table: &Table) -> Result<GeneScores> {
        let gene_idx = self.column(table, self.gene_column)?;

        match self.score {
            ScoreSource::Column(column) => {
                let score_idx = self.column(table, column)?;
                Ok(self.extract_identities(table, gene_idx, score_idx))
            }
            ScoreSource::Passed => Ok(table
                .rows()
                .iter()
                .filter_map(|row| clean_gene(&row[gene_idx]))
                .map(|gene| (gene, Score::Quality(QualityFlag::Passed)))
                .collect()),
            ScoreSource::Genotype => {
                let status_idx = self.column(table, QUALITY_MODULE)?;
                extract_genotype(table, gene_idx, status_idx)
            }
        }
    }

    fn column(&self, table: &Table, column: &'static str) -> Result<usize> {
        table
            .column_index(column)
            .ok_or_else(|| Error::MissingColumn {
                file: table.file().to_path_buf(),
                dialect: self.name,
                column,
            })
    }

    fn extract_identities(&self, table: &Table, gene_idx: usize, score_idx: usize) -> GeneScores {
        let mut genes = GeneScores::new();
        let mut unscored = 0usize;

        for row in table.rows() {
            let gene = match clean_gene(&row[gene_idx]) {
                Some(g) => g,
                None => continue,
            };

            let score = match parse_identity(&row[score_idx]) {
                Some(identity) => Score::Identity(identity),
                None => {
                    unscored += 1;
                    Score::Missing
                }
            };
            genes.insert(gene, score);
        }

        if unscored > 0 {
            debug!(
                "  [*] Found {} rows without a numeric identity in {}.",
                unscored,
                table.file().display()
            );
        }

        genes
    }
}

/// Trims whitespace and stray quotes; empty identifiers are dropped.
fn clean_gene(cell: &str) -> Option<String> {
    let gene = cell.trim().trim_matches('"').trim();
    match gene.is_empty() {
        true => None,
        false => Some(gene.to_string()),
    }
}

fn extract_genotype(table: &Table, gene_idx: usize, status_idx: usize) -> Result<GeneScores> {
    let row = table
        .rows()
        .first()
        .ok_or_else(|| Error::EmptyTable(table.file().to_path_buf()))?;

    let status = row[status_idx].trim();
    let flag = match status {
        "Passed" => QualityFlag::Passed,
        "Failed" => QualityFlag::Failed,
        s => {
            return Err(Error::UnknownQualityStatus {
                file: table.file().to_path_buf(),
                status: s.to_string(),
            })
        }
    };

    Ok(row[gene_idx]
        .split(',')
        .filter_map(clean_gene)
        .map(|gene| (gene, Score::Quality(flag)))
        .collect())
}
