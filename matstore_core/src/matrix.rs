//! The matrix entity: a bounded name plus an owned row-major `u32` buffer.

use crate::error::StoreError;
use crate::name::MatrixName;
use serde::Serialize;
use std::fmt;
use tracing::trace;

/// A named, dimensioned, owned buffer of `u32` elements.
///
/// `data.len() == rows * cols` always holds; element `(i, j)` lives at
/// offset `i * cols + j`. The dimensions are fixed for the lifetime of the
/// matrix.
#[derive(Debug, Clone, Serialize)]
pub struct Matrix {
    name: MatrixName,
    rows: u32,
    cols: u32,
    data: Vec<u32>,
}

impl Matrix {
    /// Creates a zero-filled matrix.
    ///
    /// Zero rows or columns are accepted and produce an empty buffer.
    ///
    /// # Errors
    /// - `NameTooLong` / `InvalidName` if the name fails validation
    /// - `DimensionOverflow` if `rows * cols` is not addressable
    /// - `Allocation` if the buffer cannot be reserved
    pub fn create(name: &str, rows: u32, cols: u32) -> Result<Self, StoreError> {
        let name = MatrixName::new(name)?;
        let elements = element_count(rows, cols)?;

        let mut data = Vec::new();
        data.try_reserve_exact(elements)
            .map_err(|_| StoreError::Allocation { elements })?;
        data.resize(elements, 0);

        Ok(Self {
            name,
            rows,
            cols,
            data,
        })
    }

    /// Releases the buffer, then the entity.
    ///
    /// Consumes the handle so it cannot be used afterwards.
    pub fn destroy(self) {
        trace!(name = %self.name, elements = self.data.len(), "destroying matrix");
        let Matrix { data, .. } = self;
        drop(data);
    }

    pub fn name(&self) -> &MatrixName {
        &self.name
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    /// Returns `(rows, cols)`.
    pub fn dims(&self) -> (u32, u32) {
        (self.rows, self.cols)
    }

    /// Number of elements (`rows * cols`).
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view of the buffer.
    pub fn as_slice(&self) -> &[u32] {
        &self.data
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.data
    }

    /// Returns element `(row, col)`, or `None` outside the matrix.
    pub fn get(&self, row: u32, col: u32) -> Option<u32> {
        self.offset(row, col).map(|i| self.data[i])
    }

    /// Overwrites element `(row, col)`.
    pub fn set(&mut self, row: u32, col: u32, value: u32) -> Result<(), StoreError> {
        let i = self
            .offset(row, col)
            .ok_or(StoreError::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            })?;
        self.data[i] = value;
        Ok(())
    }

    fn offset(&self, row: u32, col: u32) -> Option<usize> {
        if row < self.rows && col < self.cols {
            Some(row as usize * self.cols as usize + col as usize)
        } else {
            None
        }
    }

    /// True iff dimensions and every element match. Names are ignored.
    pub fn equal(&self, other: &Matrix) -> bool {
        self.rows == other.rows && self.cols == other.cols && self.data == other.data
    }

    /// Copies this matrix's elements into `dest`.
    ///
    /// `dest` must already have this matrix's dimensions (e.g. freshly
    /// created with them). Returns the result of [`Matrix::equal`] as a
    /// self-check.
    pub fn duplicate(&self, dest: &mut Matrix) -> Result<bool, StoreError> {
        if dest.dims() != self.dims() {
            return Err(StoreError::mismatch(self.dims(), dest.dims()));
        }
        dest.data.copy_from_slice(&self.data);
        Ok(self.equal(dest))
    }

    /// Loads a decoded buffer of exactly `len()` elements.
    pub fn load(&mut self, data: &[u32]) -> Result<(), StoreError> {
        if data.len() != self.data.len() {
            return Err(StoreError::LengthMismatch {
                expected: self.data.len(),
                found: data.len(),
            });
        }
        self.data.copy_from_slice(data);
        Ok(())
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.equal(other)
    }
}

impl Eq for Matrix {}

/// Renders the name, dimensions, and grid.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix Contents ({}):", self.name)?;
        writeln!(f, "DIM = ({},{})", self.rows, self.cols)?;
        if self.cols > 0 {
            for row in self.data.chunks(self.cols as usize) {
                for value in row {
                    write!(f, "{} ", value)?;
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// `rows * cols` as a buffer length.
pub(crate) fn element_count(rows: u32, cols: u32) -> Result<usize, StoreError> {
    (rows as usize)
        .checked_mul(cols as usize)
        .ok_or(StoreError::DimensionOverflow { rows, cols })
}
