//! A labelled, dense numeric table.
//!
//! [`Matrix`] backs both the gene × file comparison and the type × sample
//! overview. Transforms consume the matrix and return the transformed one,
//! so they chain in the order they are applied:
//!
//! ```
//! use amrsum::matrix::Matrix;
//!
//! let m = Matrix::from_rows(
//!     vec!["(1)geneX".into(), "geneY".into()],
//!     vec!["B_2_mlst.tsv".into(), "A_1_mlst.tsv".into()],
//!     vec![vec![95.0, 80.0], vec![90.0, 100.0]],
//! )
//! .binarize(90.0)
//! .with_type_row()
//! .strip_row_prefixes()
//! .sort_columns();
//!
//! assert_eq!(m.row_labels(), ["geneX", "geneY"]);
//! assert_eq!(m.column_labels(), ["A_1_mlst.tsv", "B_2_mlst.tsv"]);
//! assert_eq!(m.type_row().unwrap(), ["mlst", "mlst"]);
//! assert_eq!(m.get(0, 0), 0.0);
//! assert_eq!(m.get(0, 1), 1.0);
//! ```

pub mod cluster;
pub mod correlation;

use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::Axis;

use crate::organise::classify::type_from_file_name;

/// Label of the annotation row holding the sample type of each column.
pub const TYPE_ROW_LABEL: &str = "type";

/// A dense matrix of `f64` values with row and column labels, plus an
/// optional row of sample types shown above the data.
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: Vec<String>,
    columns: Vec<String>,
    values: Array2<f64>,
    type_row: Option<Vec<String>>,
}

impl Matrix {
    /// Creates a matrix from row-major values.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions of `values` do not match the labels.
    pub fn from_rows(rows: Vec<String>, columns: Vec<String>, values: Vec<Vec<f64>>) -> Matrix {
        assert_eq!(rows.len(), values.len(), "one value row per row label");
        assert!(
            values.iter().all(|r| r.len() == columns.len()),
            "one value per column label in every row"
        );

        let values = Array2::from_shape_fn((rows.len(), columns.len()), |(i, j)| values[i][j]);
        Matrix::from_array(rows, columns, values)
    }

    /// Creates a matrix from an array shaped `rows × columns`.
    ///
    /// # Panics
    ///
    /// Panics if the shape of `values` does not match the labels.
    pub fn from_array(rows: Vec<String>, columns: Vec<String>, values: Array2<f64>) -> Matrix {
        assert_eq!(
            values.dim(),
            (rows.len(), columns.len()),
            "array shaped rows × columns"
        );

        Matrix {
            rows,
            columns,
            values,
            type_row: None,
        }
    }

    /// Creates a matrix where every cell holds `fill`.
    pub fn filled(rows: Vec<String>, columns: Vec<String>, fill: f64) -> Matrix {
        let values = Array2::from_elem((rows.len(), columns.len()), fill);
        Matrix::from_array(rows, columns, values)
    }

    /// Row labels, top to bottom.
    pub fn row_labels(&self) -> &[String] {
        &self.rows
    }

    /// Column labels, left to right.
    pub fn column_labels(&self) -> &[String] {
        &self.columns
    }

    /// The sample type annotation, one entry per column, if present.
    pub fn type_row(&self) -> Option<&[String]> {
        self.type_row.as_deref()
    }

    /// Number of data rows (the type row is not counted).
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns.
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Whether the matrix holds no cells.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// The value at row `row` and column `column`.
    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.values[[row, column]]
    }

    /// Sets the value at row `row` and column `column`.
    pub fn set(&mut self, row: usize, column: usize, value: f64) {
        self.values[[row, column]] = value;
    }

    /// The values of one row.
    pub fn row(&self, row: usize) -> ArrayView1<'_, f64> {
        self.values.row(row)
    }

    /// The values of one column.
    pub fn column(&self, column: usize) -> ArrayView1<'_, f64> {
        self.values.column(column)
    }

    /// Position of the row with the given label.
    pub fn row_index(&self, label: &str) -> Option<usize> {
        self.rows.iter().position(|r| r == label)
    }

    /// Position of the column with the given label.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == label)
    }

    /// Looks a value up by its labels.
    pub fn value(&self, row: &str, column: &str) -> Option<f64> {
        Some(self.get(self.row_index(row)?, self.column_index(column)?))
    }

    /// Removes the row with the given label, if present.
    pub fn drop_row(self, label: &str) -> Matrix {
        match self.row_index(label) {
            Some(i) => {
                let keep: Vec<usize> = (0..self.n_rows()).filter(|&r| r != i).collect();
                let columns: Vec<usize> = (0..self.n_columns()).collect();
                self.select(&keep, &columns)
            }
            None => self,
        }
    }

    /// Removes the column with the given label, if present. The type row
    /// loses the matching entry.
    pub fn drop_column(self, label: &str) -> Matrix {
        match self.column_index(label) {
            Some(j) => {
                let rows: Vec<usize> = (0..self.n_rows()).collect();
                let keep: Vec<usize> = (0..self.n_columns()).filter(|&c| c != j).collect();
                self.select(&rows, &keep)
            }
            None => self,
        }
    }

    /// Replaces every value with 1 when it is at least `cutoff`, else 0.
    pub fn binarize(mut self, cutoff: f64) -> Matrix {
        self.values
            .mapv_inplace(|v| if v >= cutoff { 1.0 } else { 0.0 });
        self
    }

    /// Rearranges rows and columns. `row_order[i]` is the current position of
    /// the row that ends up at position `i`; likewise for columns. Both
    /// orders must be permutations of their axis.
    pub fn reorder(self, row_order: &[usize], column_order: &[usize]) -> Matrix {
        debug_assert_eq!(row_order.len(), self.rows.len());
        debug_assert_eq!(column_order.len(), self.columns.len());
        self.select(row_order, column_order)
    }

    /// Keeps the rows and columns at the given positions, in that order.
    fn select(self, row_order: &[usize], column_order: &[usize]) -> Matrix {
        let rows = row_order.iter().map(|&i| self.rows[i].clone()).collect();
        let columns = column_order
            .iter()
            .map(|&j| self.columns[j].clone())
            .collect();
        let values = self
            .values
            .select(Axis(0), row_order)
            .select(Axis(1), column_order);
        let type_row = self
            .type_row
            .as_ref()
            .map(|t| column_order.iter().map(|&j| t[j].clone()).collect());

        Matrix {
            rows,
            columns,
            values,
            type_row,
        }
    }

    /// Annotates every column with the sample type parsed from its label.
    pub fn with_type_row(mut self) -> Matrix {
        self.type_row = Some(
            self.columns
                .iter()
                .map(|c| type_from_file_name(c))
                .collect(),
        );
        self
    }

    /// Removes a leading parenthesised prefix such as `(3)` from row labels.
    pub fn strip_row_prefixes(mut self) -> Matrix {
        for label in self.rows.iter_mut() {
            if let Some(stripped) = strip_parenthesised_prefix(label) {
                *label = stripped.to_string();
            }
        }
        self
    }

    /// Sorts the columns by label.
    pub fn sort_columns(self) -> Matrix {
        let mut order: Vec<usize> = (0..self.columns.len()).collect();
        order.sort_by(|&a, &b| self.columns[a].cmp(&self.columns[b]));

        let rows: Vec<usize> = (0..self.rows.len()).collect();
        self.reorder(&rows, &order)
    }

    /// Sorts the rows by the values in one column, largest first. Rows with
    /// equal values keep their relative order.
    pub fn sort_rows_descending_by(self, column: usize) -> Matrix {
        let mut order: Vec<usize> = (0..self.rows.len()).collect();
        order.sort_by(|&a, &b| {
            self.values[[b, column]].total_cmp(&self.values[[a, column]])
        });

        let columns: Vec<usize> = (0..self.columns.len()).collect();
        self.reorder(&order, &columns)
    }

    /// Consumes the matrix, returning its values row by row.
    pub fn into_values(self) -> Vec<Vec<f64>> {
        self.values.outer_iter().map(|row| row.to_vec()).collect()
    }
}

/// `"(3)GeneX"` → `Some("GeneX")`; labels without a parenthesised prefix give
/// `None`.
fn strip_parenthesised_prefix(label: &str) -> Option<&str> {
    if !label.starts_with('(') {
        return None;
    }

    label.split_once(')').map(|(_, rest)| rest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_binarize_is_monotonic_at_the_cutoff() {
        let m = Matrix::from_rows(
            labels(&["a", "b", "c"]),
            labels(&["x"]),
            vec![vec![90.0], vec![89.0], vec![100.0]],
        )
        .binarize(90.0);

        assert_eq!(m.column(0).to_vec(), vec![1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_drop_row() {
        let m = Matrix::filled(labels(&["-", "geneX"]), labels(&["x"]), 0.0).drop_row("-");
        assert_eq!(m.row_labels(), ["geneX"]);
        assert_eq!(m.n_rows(), 1);

        let unchanged = m.clone().drop_row("absent");
        assert_eq!(unchanged, m);
    }

    #[test]
    fn test_drop_column_shrinks_the_type_row() {
        let m = Matrix::from_rows(
            labels(&["mlst", "card"]),
            labels(&["A_1_mlst.tsv", "sum", "B_2_card.txt"]),
            vec![vec![1.0, 1.0, 0.0], vec![0.0, 1.0, 1.0]],
        )
        .with_type_row()
        .drop_column("sum");

        assert_eq!(m.column_labels(), ["A_1_mlst.tsv", "B_2_card.txt"]);
        assert_eq!(m.row(1).to_vec(), [0.0, 1.0]);
        assert_eq!(m.type_row().unwrap(), ["mlst", "card"]);

        let unchanged = m.clone().drop_column("absent");
        assert_eq!(unchanged, m);
    }

    #[test]
    fn test_into_values_is_row_major() {
        let m = Matrix::from_rows(
            labels(&["a", "b"]),
            labels(&["x", "y"]),
            vec![vec![1.0, 2.0], vec![3.0, 4.0]],
        );
        assert_eq!(m.into_values(), vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
    }

    #[test]
    fn test_strip_row_prefixes() {
        let m = Matrix::filled(
            labels(&["(3)GeneX", "GeneY", "(unclosed", "(1)(2)GeneZ"]),
            labels(&["x"]),
            0.0,
        )
        .strip_row_prefixes();

        assert_eq!(m.row_labels(), ["GeneX", "GeneY", "(unclosed", "(2)GeneZ"]);
    }

    #[test]
    fn test_sort_columns_moves_values_and_types() {
        let m = Matrix::from_rows(
            labels(&["geneX"]),
            labels(&["B_2_card.txt", "A_1_mlst.tsv"]),
            vec![vec![1.0, 2.0]],
        )
        .with_type_row()
        .sort_columns();

        assert_eq!(m.column_labels(), ["A_1_mlst.tsv", "B_2_card.txt"]);
        assert_eq!(m.row(0).to_vec(), [2.0, 1.0]);
        assert_eq!(m.type_row().unwrap(), ["mlst", "card"]);
    }

    #[test]
    fn test_sort_rows_descending_is_stable() {
        let m = Matrix::from_rows(
            labels(&["a", "b", "c", "d"]),
            labels(&["sum"]),
            vec![vec![1.0], vec![3.0], vec![1.0], vec![2.0]],
        )
        .sort_rows_descending_by(0);

        assert_eq!(m.row_labels(), ["b", "d", "a", "c"]);
    }

    #[test]
    fn test_value_lookup() {
        let m = Matrix::from_rows(labels(&["g"]), labels(&["f"]), vec![vec![4.0]]);
        assert_eq!(m.value("g", "f"), Some(4.0));
        assert_eq!(m.value("g", "missing"), None);
    }
}
