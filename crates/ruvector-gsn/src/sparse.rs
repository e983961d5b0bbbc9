//! Compressed sparse row storage for node features and summarization matrices.
//!
//! Node-to-DAG and DAG-to-global matrices have one non-zero per node, so CSR
//! keeps aggregation at O(nnz * D) instead of O(R * C * D).

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::error::{GsnError, Result};

// ---------------------------------------------------------------------------
// CsrMatrix
// ---------------------------------------------------------------------------

/// Compressed Sparse Row (CSR) matrix of `f32`.
///
/// # Layout
///
/// For a matrix with `m` rows and `nnz` non-zeros:
/// - `row_ptr` has length `m + 1`
/// - `col_indices` and `values` each have length `nnz`
/// - Row `i` spans indices `row_ptr[i]..row_ptr[i+1]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "CsrParts")]
pub struct CsrMatrix {
    row_ptr: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<f32>,
    rows: usize,
    cols: usize,
}

/// Unvalidated wire form; deserialization goes through [`CsrMatrix::new`].
#[derive(Deserialize)]
struct CsrParts {
    row_ptr: Vec<usize>,
    col_indices: Vec<usize>,
    values: Vec<f32>,
    rows: usize,
    cols: usize,
}

impl TryFrom<CsrParts> for CsrMatrix {
    type Error = GsnError;

    fn try_from(p: CsrParts) -> Result<Self> {
        CsrMatrix::new(p.rows, p.cols, p.row_ptr, p.col_indices, p.values)
    }
}

impl CsrMatrix {
    /// Build a CSR matrix from raw parts, validating the structure.
    ///
    /// # Errors
    /// Returns `GsnError::ShapeMismatch` if the parts are inconsistent with
    /// the declared shape.
    pub fn new(
        rows: usize,
        cols: usize,
        row_ptr: Vec<usize>,
        col_indices: Vec<usize>,
        values: Vec<f32>,
    ) -> Result<Self> {
        let matrix = Self {
            row_ptr,
            col_indices,
            values,
            rows,
            cols,
        };
        matrix.validate()?;
        Ok(matrix)
    }

    /// Build a CSR matrix from COO (coordinate) triplets.
    ///
    /// Entries are sorted by (row, col). Duplicate positions are summed.
    ///
    /// # Errors
    /// Returns `GsnError::ShapeMismatch` if an index falls outside `rows x cols`.
    pub fn from_coo(
        rows: usize,
        cols: usize,
        entries: impl IntoIterator<Item = (usize, usize, f32)>,
    ) -> Result<Self> {
        let mut sorted: Vec<_> = entries.into_iter().collect();
        for &(r, c, _) in &sorted {
            if r >= rows || c >= cols {
                return Err(GsnError::shape_mismatch(
                    "csr_from_coo",
                    format!("index within {}x{}", rows, cols),
                    format!("({}, {})", r, c),
                ));
            }
        }
        sorted.sort_unstable_by_key(|(r, c, _)| (*r, *c));

        let mut row_ptr = vec![0usize; rows + 1];
        let mut col_indices: Vec<usize> = Vec::with_capacity(sorted.len());
        let mut values: Vec<f32> = Vec::with_capacity(sorted.len());
        let mut last: Option<(usize, usize)> = None;

        for (r, c, v) in sorted {
            if last == Some((r, c)) {
                if let Some(acc) = values.last_mut() {
                    *acc += v;
                }
                continue;
            }
            row_ptr[r + 1] += 1;
            col_indices.push(c);
            values.push(v);
            last = Some((r, c));
        }
        for i in 1..=rows {
            row_ptr[i] += row_ptr[i - 1];
        }

        Ok(Self {
            row_ptr,
            col_indices,
            values,
            rows,
            cols,
        })
    }

    /// Encode a dense matrix, keeping only non-zero entries.
    pub fn from_dense(dense: ArrayView2<'_, f32>) -> Self {
        let (rows, cols) = dense.dim();
        let mut row_ptr = Vec::with_capacity(rows + 1);
        let mut col_indices = Vec::new();
        let mut values = Vec::new();

        row_ptr.push(0);
        for row in dense.rows() {
            for (c, &v) in row.iter().enumerate() {
                if v != 0.0 {
                    col_indices.push(c);
                    values.push(v);
                }
            }
            row_ptr.push(values.len());
        }

        Self {
            row_ptr,
            col_indices,
            values,
            rows,
            cols,
        }
    }

    /// Build a square identity matrix of dimension `n`.
    pub fn identity(n: usize) -> Self {
        Self {
            row_ptr: (0..=n).collect(),
            col_indices: (0..n).collect(),
            values: vec![1.0; n],
            rows: n,
            cols: n,
        }
    }

    /// Number of rows.
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`
    #[inline]
    pub fn dim(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Number of non-zero entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Iterate over `(col_index, value)` pairs for the given row.
    #[inline]
    pub fn row_entries(&self, row: usize) -> impl Iterator<Item = (usize, f32)> + '_ {
        let start = self.row_ptr[row];
        let end = self.row_ptr[row + 1];
        self.col_indices[start..end]
            .iter()
            .copied()
            .zip(self.values[start..end].iter().copied())
    }

    /// Expand to a dense matrix.
    pub fn to_dense(&self) -> Array2<f32> {
        let mut dense = Array2::zeros((self.rows, self.cols));
        for r in 0..self.rows {
            for (c, v) in self.row_entries(r) {
                dense[[r, c]] += v;
            }
        }
        dense
    }

    /// Multiply every stored value by `k`.
    pub fn scale(&self, k: f32) -> Self {
        Self {
            values: self.values.iter().map(|&v| v * k).collect(),
            ..self.clone()
        }
    }

    /// Sparse-dense product: `self * rhs`.
    ///
    /// # Errors
    /// Returns `GsnError::ShapeMismatch` if `self.cols() != rhs.nrows()`.
    pub fn dot_dense(&self, rhs: ArrayView2<'_, f32>) -> Result<Array2<f32>> {
        if self.cols != rhs.nrows() {
            return Err(GsnError::shape_mismatch(
                "sparse_matmul",
                format!("rhs with {} rows", self.cols),
                format!("{}x{}", rhs.nrows(), rhs.ncols()),
            ));
        }

        let mut out = Array2::zeros((self.rows, rhs.ncols()));
        for (r, mut out_row) in out.rows_mut().into_iter().enumerate() {
            for (c, v) in self.row_entries(r) {
                out_row.scaled_add(v, &rhs.row(c));
            }
        }
        Ok(out)
    }

    /// Validate the structural integrity of the matrix.
    ///
    /// Checks, in order:
    ///
    /// 1. `row_ptr` length equals `rows + 1`.
    /// 2. `row_ptr[0] == 0` and `row_ptr` is monotonically non-decreasing.
    /// 3. `row_ptr[rows]`, `col_indices` length and `values` length agree.
    /// 4. All column indices are less than `cols`.
    /// 5. Column indices are sorted within each row (emits a
    ///    [`tracing::warn`] if not, but does not error).
    ///
    /// # Errors
    /// Returns `GsnError::ShapeMismatch` describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        let expected_len = self.rows.checked_add(1).ok_or_else(|| {
            GsnError::shape_mismatch(
                "csr_validate",
                format!("row count below {}", usize::MAX),
                format!("{} rows", self.rows),
            )
        })?;
        if self.row_ptr.len() != expected_len {
            return Err(GsnError::shape_mismatch(
                "csr_validate",
                format!("row_ptr of length {}", expected_len),
                format!("length {}", self.row_ptr.len()),
            ));
        }

        if self.row_ptr[0] != 0 {
            return Err(GsnError::shape_mismatch(
                "csr_validate",
                "row_ptr[0] = 0",
                format!("row_ptr[0] = {}", self.row_ptr[0]),
            ));
        }
        for i in 1..self.row_ptr.len() {
            if self.row_ptr[i] < self.row_ptr[i - 1] {
                return Err(GsnError::shape_mismatch(
                    "csr_validate",
                    "non-decreasing row_ptr",
                    format!("decrease at position {}", i),
                ));
            }
        }

        let nnz = self.row_ptr[self.rows];
        if self.col_indices.len() != nnz || self.values.len() != nnz {
            return Err(GsnError::shape_mismatch(
                "csr_validate",
                format!("{} column indices and values", nnz),
                format!(
                    "{} column indices, {} values",
                    self.col_indices.len(),
                    self.values.len()
                ),
            ));
        }

        for row in 0..self.rows {
            let start = self.row_ptr[row];
            let end = self.row_ptr[row + 1];
            for idx in start..end {
                let c = self.col_indices[idx];
                if c >= self.cols {
                    return Err(GsnError::shape_mismatch(
                        "csr_validate",
                        format!("column index < {}", self.cols),
                        format!("column {} in row {}", c, row),
                    ));
                }
                if idx > start && c <= self.col_indices[idx - 1] {
                    tracing::warn!(
                        row,
                        position = idx,
                        "column indices are not strictly sorted within row"
                    );
                }
            }
        }

        Ok(())
    }
}
