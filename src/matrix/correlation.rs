//! Pearson correlation between matrix columns.

use ndarray::Array2;
use ndarray_stats::CorrelationExt;

use super::Matrix;

impl Matrix {
    /// Replaces the matrix with the column × column Pearson correlation
    /// matrix. Both axes are labelled with the original column labels. Pairs
    /// involving a column without variance are NaN. Any type row is dropped.
    pub fn correlation(self) -> Matrix {
        let n = self.n_columns();

        // Variables are rows for `pearson_correlation`, so correlate the
        // transpose. Without rows there are no observations to correlate.
        let values = self
            .values
            .t()
            .pearson_correlation()
            .unwrap_or_else(|_| Array2::from_elem((n, n), f64::NAN));

        let labels = self.column_labels().to_vec();
        Matrix::from_array(labels.clone(), labels, values)
    }
}
