//! Dense or sparse 2-D matrix, and the left-multiplication seam shared by
//! the feature transform and the aggregator.

use ndarray::{Array2, ArrayView2};

use crate::error::{GsnError, Result};
use crate::sparse::CsrMatrix;

/// A 2-D `f32` matrix in either dense or CSR representation.
///
/// Both variants describe the same logical content; every operation here
/// produces numerically equivalent results regardless of the tag.
#[derive(Debug, Clone, PartialEq)]
pub enum Matrix {
    /// Row-major dense storage
    Dense(Array2<f32>),
    /// Compressed sparse row storage
    Sparse(CsrMatrix),
}

impl Matrix {
    /// `(rows, cols)`
    pub fn dim(&self) -> (usize, usize) {
        match self {
            Matrix::Dense(m) => m.dim(),
            Matrix::Sparse(m) => m.dim(),
        }
    }

    /// Expand to dense storage
    pub fn to_dense(&self) -> Array2<f32> {
        match self {
            Matrix::Dense(m) => m.clone(),
            Matrix::Sparse(m) => m.to_dense(),
        }
    }

    /// Product with a dense right-hand side: `self * rhs`.
    ///
    /// # Errors
    /// Returns `GsnError::ShapeMismatch` if the column count of `self`
    /// differs from `rhs.nrows()`.
    pub fn dot(&self, rhs: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        match self {
            Matrix::Dense(m) => dense_dot(m.view(), rhs),
            Matrix::Sparse(m) => m.dot_dense(rhs),
        }
    }
}

/// Dense product with an explicit shape check, since `ndarray` panics instead.
pub(crate) fn dense_dot(lhs: ArrayView2<'_, f32>, rhs: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
    if lhs.ncols() != rhs.nrows() {
        return Err(GsnError::shape_mismatch(
            "dense_matmul",
            format!("rhs with {} rows", lhs.ncols()),
            format!("{}x{}", rhs.nrows(), rhs.ncols()),
        ));
    }
    Ok(lhs.dot(&rhs))
}

/// Anything that can left-multiply a dense `f32` matrix.
pub trait LeftMultiply {
    /// `(rows, cols)` of the left operand
    fn dim(&self) -> (usize, usize);

    /// Compute `self * rhs`.
    ///
    /// # Errors
    /// Returns `GsnError::ShapeMismatch` if the column count of `self`
    /// differs from the row count of `rhs`.
    fn left_mul(&self, rhs: ArrayView2<'_, f32>) -> Result<Array2<f32>>;
}

impl LeftMultiply for Matrix {
    fn dim(&self) -> (usize, usize) {
        Matrix::dim(self)
    }

    fn left_mul(&self, rhs: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        self.dot(rhs)
    }
}

impl LeftMultiply for CsrMatrix {
    fn dim(&self) -> (usize, usize) {
        CsrMatrix::dim(self)
    }

    fn left_mul(&self, rhs: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        self.dot_dense(rhs)
    }
}

impl LeftMultiply for Array2<f32> {
    fn dim(&self) -> (usize, usize) {
        Array2::dim(self)
    }

    fn left_mul(&self, rhs: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        dense_dot(self.view(), rhs)
    }
}

impl LeftMultiply for ArrayView2<'_, f32> {
    fn dim(&self) -> (usize, usize) {
        ArrayView2::dim(self)
    }

    fn left_mul(&self, rhs: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        dense_dot(self.view(), rhs)
    }
}

impl From<Array2<f32>> for Matrix {
    fn from(m: Array2<f32>) -> Self {
        Matrix::Dense(m)
    }
}

impl From<CsrMatrix> for Matrix {
    fn from(m: CsrMatrix) -> Self {
        Matrix::Sparse(m)
    }
}
