//! Presence overview of which sample has results of which type.

pub mod command;

use crate::matrix::Matrix;
use crate::organise::SampleIndex;

/// Label of the column holding the per-type totals.
pub const SUM_COLUMN: &str = "sum";

/// Builds the sample type × sample name presence matrix.
///
/// A cell is 1 when a file of that type was found for that sample and 0
/// otherwise. A trailing [`SUM_COLUMN`] holds the number of samples with a
/// file of each type, and rows are sorted by it, most complete type first.
/// Types with equal totals stay in alphabetical order.
pub fn build_overview(index: &SampleIndex) -> Matrix {
    let types = index.sample_types().to_vec();
    let mut columns: Vec<String> = index.sample_names().map(String::from).collect();
    let sum_column = columns.len();
    columns.push(String::from(SUM_COLUMN));

    let mut matrix = Matrix::filled(types, columns, 0.0);
    for (j, name) in index.sample_names().enumerate() {
        for (i, sample_type) in index.sample_types().iter().enumerate() {
            if index.get(name, sample_type).is_some() {
                matrix.set(i, j, 1.0);
                let total = matrix.get(i, sum_column);
                matrix.set(i, sum_column, total + 1.0);
            }
        }
    }

    matrix.sort_rows_descending_by(sum_column)
}

/// The overview without its [`SUM_COLUMN`], for plotting.
pub fn presence_only(overview: &Matrix) -> Matrix {
    overview.clone().drop_column(SUM_COLUMN)
}
