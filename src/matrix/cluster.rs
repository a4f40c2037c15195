//! Hierarchical clustering of matrix rows and columns.
//!
//! Both axes are clustered independently with Ward linkage over Euclidean
//! distances, and reordered by the leaf order of the resulting dendrograms.
//! Similar genes and similar samples therefore end up next to each other.

use kodama::linkage;
use kodama::Method;
use ndarray::ArrayView1;
use ndarray::ArrayView2;
use tracing::debug;

use super::Matrix;

impl Matrix {
    /// Reorders rows and columns by Ward clustering. An axis with fewer than
    /// two entries keeps its order.
    pub fn cluster(self) -> Matrix {
        let row_order = leaf_order(self.values.view());
        let column_order = leaf_order(self.values.t());
        debug!(
            "  [*] Clustered {} rows and {} columns.",
            row_order.len(),
            column_order.len()
        );

        self.reorder(&row_order, &column_order)
    }
}

/// The order of the leaves of the Ward dendrogram over the rows of
/// `observations`.
///
/// The children of every merge are visited lowest label first, so the result
/// only depends on the input order when merges tie.
pub fn leaf_order(observations: ArrayView2<'_, f64>) -> Vec<usize> {
    let n = observations.nrows();
    if n < 2 {
        return (0..n).collect();
    }

    let mut condensed = Vec::with_capacity(n * (n - 1) / 2);
    for i in 0..n - 1 {
        for j in i + 1..n {
            condensed.push(euclidean(observations.row(i), observations.row(j)));
        }
    }

    let dendrogram = linkage(&mut condensed, n, Method::Ward);
    let steps = dendrogram.steps();

    // Cluster labels below `n` are observations; label `n + i` is the cluster
    // formed by step `i`. The last step forms the root.
    let mut order = Vec::with_capacity(n);
    let mut stack = vec![n + steps.len() - 1];
    while let Some(label) = stack.pop() {
        if label < n {
            order.push(label);
            continue;
        }

        let step = &steps[label - n];
        let (first, second) = if step.cluster1 <= step.cluster2 {
            (step.cluster1, step.cluster2)
        } else {
            (step.cluster2, step.cluster1)
        };
        stack.push(second);
        stack.push(first);
    }

    order
}

fn euclidean(a: ArrayView1<'_, f64>, b: ArrayView1<'_, f64>) -> f64 {
    (&a - &b).mapv(|d| d * d).sum().sqrt()
}

#[cfg(test)]
mod tests {
    use ndarray::array;
    use ndarray::Array2;

    use super::*;

    #[test]
    fn test_leaf_order_is_a_permutation() {
        let observations = array![
            [0.0, 0.0],
            [10.0, 10.0],
            [0.5, 0.0],
            [10.0, 9.5],
            [5.0, 5.0],
        ];
        let mut order = leaf_order(observations.view());
        assert_eq!(order.len(), 5);
        order.sort_unstable();
        assert_eq!(order, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_close_observations_are_adjacent() {
        let observations = array![[0.0], [100.0], [1.0], [101.0]];
        let order = leaf_order(observations.view());

        let position = |x: usize| order.iter().position(|&o| o == x).unwrap();
        assert_eq!(position(0).abs_diff(position(2)), 1);
        assert_eq!(position(1).abs_diff(position(3)), 1);
    }

    #[test]
    fn test_small_axes_are_untouched() {
        let empty = Array2::<f64>::zeros((0, 3));
        assert_eq!(leaf_order(empty.view()), Vec::<usize>::new());
        assert_eq!(leaf_order(array![[1.0]].view()), vec![0]);
    }

    #[test]
    fn test_cluster_keeps_cells_with_their_labels() {
        let m = Matrix::from_rows(
            vec!["g1".into(), "g2".into(), "g3".into()],
            vec!["a".into(), "b".into(), "c".into()],
            vec![
                vec![100.0, 0.0, 99.0],
                vec![0.0, 100.0, 0.0],
                vec![98.0, 0.0, 100.0],
            ],
        );
        let clustered = m.clone().cluster();

        for row in m.row_labels() {
            for column in m.column_labels() {
                assert_eq!(m.value(row, column), clustered.value(row, column));
            }
        }
    }
}
