//! Shared test helpers for the ruvector-gsn integration test suite.
//!
//! Provides summarization-matrix builders and floating-point comparison
//! utilities used across all test modules.

#![allow(dead_code)]

use ndarray::Array2;

/// Level-0 matrix for DAGs of the given sizes, nodes numbered consecutively.
///
/// `weight` picks the per-node aggregation weight given the DAG size.
pub fn dag_level_matrix(dag_sizes: &[usize], weight: impl Fn(usize) -> f32) -> Array2<f32> {
    let num_nodes: usize = dag_sizes.iter().sum();
    let mut m = Array2::zeros((dag_sizes.len(), num_nodes));
    let mut node = 0;
    for (dag, &size) in dag_sizes.iter().enumerate() {
        for _ in 0..size {
            m[[dag, node]] = weight(size);
            node += 1;
        }
    }
    m
}

/// Summation weights
pub fn sum_weight(_size: usize) -> f32 {
    1.0
}

/// Averaging weights
pub fn mean_weight(size: usize) -> f32 {
    1.0 / size as f32
}

/// Assert two matrices have the same shape and agree within `tol`.
pub fn assert_close(a: &Array2<f32>, b: &Array2<f32>, tol: f32) {
    assert_eq!(a.dim(), b.dim(), "shape mismatch");
    for ((idx, &x), &y) in a.indexed_iter().zip(b.iter()) {
        assert!(
            (x - y).abs() <= tol,
            "values at {:?} differ: {} vs {} (diff: {})",
            idx,
            x,
            y,
            (x - y).abs()
        );
    }
}
