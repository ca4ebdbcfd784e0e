//! Dense row-major `f64` matrix for contact and travel coefficients.

use crate::{CoreError, CoreResult};

/// A dense `rows × cols` matrix.
///
/// Serialised as a list of rows (`[[f64]]`) when the `serde` feature is on.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")
)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// An all-zero matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self { rows, cols, data: vec![0.0; rows * cols] }
    }

    /// The `n × n` identity.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n, n);
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        m
    }

    /// Build from a list of rows, rejecting ragged input.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> CoreResult<Self> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n_cols {
                return Err(CoreError::RaggedMatrix { row: i, expected: n_cols, got: row.len() });
            }
            data.extend(row);
        }
        Ok(Self { rows: n_rows, cols: n_cols, data })
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Element `(r, c)`.  Panics on out-of-range indices, like slice indexing.
    #[inline]
    pub fn get(&self, r: usize, c: usize) -> f64 {
        self.data[r * self.cols + c]
    }

    /// Checked element access.
    pub fn try_get(&self, r: usize, c: usize) -> CoreResult<f64> {
        if r >= self.rows || c >= self.cols {
            return Err(CoreError::OutOfRange { row: r, col: c, rows: self.rows, cols: self.cols });
        }
        Ok(self.get(r, c))
    }

    #[inline]
    pub fn set(&mut self, r: usize, c: usize, value: f64) {
        self.data[r * self.cols + c] = value;
    }

    /// Row `r` as a slice.
    #[inline]
    pub fn row(&self, r: usize) -> &[f64] {
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    /// `self += scale * other`.  Shapes must match.
    pub fn add_scaled(&mut self, other: &Matrix, scale: f64) {
        debug_assert_eq!((self.rows, self.cols), (other.rows, other.cols));
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a += scale * b;
        }
    }
}

impl TryFrom<Vec<Vec<f64>>> for Matrix {
    type Error = CoreError;

    fn try_from(rows: Vec<Vec<f64>>) -> CoreResult<Self> {
        Matrix::from_rows(rows)
    }
}

impl From<Matrix> for Vec<Vec<f64>> {
    fn from(m: Matrix) -> Self {
        m.data.chunks(m.cols.max(1)).take(m.rows).map(<[f64]>::to_vec).collect()
    }
}
