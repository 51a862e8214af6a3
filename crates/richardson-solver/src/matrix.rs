//! Dense row-major matrix storage.
//!
//! Rows are contiguous so that each worker in a row sweep reads a single
//! slice of the matrix. Conversions to and from `nalgebra::DMatrix` (which is
//! column-major) are provided for callers that already hold nalgebra data.

use std::ops::Index;

use nalgebra::DMatrix;

use crate::error::{Error, Result};
use crate::helpers::dot;
use crate::scalar::Real;

/// Dense real matrix stored in row-major order.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T = f64> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

impl<T: Real> DenseMatrix<T> {
    /// Create from a row-major buffer of length `nrows * ncols`.
    pub fn from_row_major(nrows: usize, ncols: usize, data: Vec<T>) -> Result<Self> {
        let len = checked_len(nrows, ncols)?;
        if data.len() != len {
            return Err(Error::InvalidMatrixData(format!(
                "buffer holds {} values, {}x{} needs {}",
                data.len(),
                nrows,
                ncols,
                len
            )));
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Create from a list of rows. All rows must have the same length.
    pub fn from_rows(rows: &[Vec<T>]) -> Result<Self> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(checked_len(nrows, ncols)?);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != ncols {
                return Err(Error::InvalidMatrixData(format!(
                    "row {} has {} columns, expected {}",
                    i,
                    row.len(),
                    ncols
                )));
            }
            data.extend_from_slice(row);
        }
        Ok(Self { data, nrows, ncols })
    }

    /// Create by evaluating `f(row, col)` for every entry.
    ///
    /// # Panics
    /// Panics if `nrows * ncols` overflows `usize`.
    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(len_or_panic(nrows, ncols));
        for i in 0..nrows {
            for j in 0..ncols {
                data.push(f(i, j));
            }
        }
        Self { data, nrows, ncols }
    }

    /// # Panics
    /// Panics if `nrows * ncols` overflows `usize`.
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self {
            data: vec![T::zero(); len_or_panic(nrows, ncols)],
            nrows,
            ncols,
        }
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Borrow row `i` as a contiguous slice.
    ///
    /// # Panics
    /// Panics if `i >= nrows()`.
    #[inline]
    pub fn row(&self, i: usize) -> &[T] {
        let start = i * self.ncols;
        &self.data[start..start + self.ncols]
    }

    /// Iterate over the rows in order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[T]> + '_ {
        (0..self.nrows).map(move |i| self.row(i))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.nrows && col < self.ncols {
            Some(self.data[row * self.ncols + col])
        } else {
            None
        }
    }

    /// The underlying row-major buffer.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Sequential matrix-vector product `A * x`.
    pub fn mul_vec(&self, x: &[T]) -> Result<Vec<T>> {
        if x.len() != self.ncols {
            return Err(Error::DimensionMismatch {
                what: "vector",
                expected: self.ncols,
                actual: x.len(),
            });
        }
        Ok(self.rows().map(|row| dot(row, x)).collect())
    }
}

/// Number of entries in an `nrows x ncols` matrix.
fn checked_len(nrows: usize, ncols: usize) -> Result<usize> {
    nrows.checked_mul(ncols).ok_or_else(|| {
        Error::InvalidMatrixData(format!("{}x{} entries overflow usize", nrows, ncols))
    })
}

fn len_or_panic(nrows: usize, ncols: usize) -> usize {
    match nrows.checked_mul(ncols) {
        Some(len) => len,
        None => panic!("matrix size {nrows}x{ncols} overflows usize"),
    }
}

impl<T: Real + nalgebra::Scalar> DenseMatrix<T> {
    /// Copy into a column-major nalgebra matrix.
    pub fn to_nalgebra(&self) -> DMatrix<T> {
        DMatrix::from_row_slice(self.nrows, self.ncols, &self.data)
    }
}

impl<T: Real + nalgebra::Scalar> From<&DMatrix<T>> for DenseMatrix<T> {
    fn from(m: &DMatrix<T>) -> Self {
        Self::from_fn(m.nrows(), m.ncols(), |i, j| m[(i, j)])
    }
}

impl<T> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(col < self.ncols, "column index {col} out of bounds");
        &self.data[row * self.ncols + col]
    }
}
