//! Structural aggregation: combine many rows into fewer rows.
//!
//! The summarization matrix `M` encodes which input rows feed which output
//! row (node -> DAG, DAG -> global) and with what weight. This module has no
//! notion of graph topology; it only applies `M`.

use ndarray::{Array2, ArrayView2};

use crate::error::Result;
use crate::matrix::LeftMultiply;

/// Compute `summ_mat * features`.
///
/// # Errors
/// Returns `GsnError::ShapeMismatch` if `summ_mat` has a column count
/// different from the row count of `features`.
#[inline]
pub fn aggregate<M>(summ_mat: &M, features: ArrayView2<'_, f32>) -> Result<Array2<f32>>
where
    M: LeftMultiply + ?Sized,
{
    summ_mat.left_mul(features)
}
