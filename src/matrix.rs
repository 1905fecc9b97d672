use bitvec::vec::BitVec;

use crate::error::{Error, Result};

/// Read-only view of an exact cover instance: a 0/1 matrix whose columns are
/// split into a primary block followed by an optional secondary block.
///
/// A solution must cover every primary column exactly once and every
/// secondary column at most once. Implementations must keep all primary
/// columns grouped before all secondary columns, so the single index
/// returned by [`Self::first_secondary_col`] determines the split.
pub trait Matrix {
    /// Number of rows in the instance.
    fn rows(&self) -> usize;

    /// Number of columns in the instance.
    fn cols(&self) -> usize;

    /// Whether the instance has a 1 at (`row`, `col`).
    fn value(&self, row: usize, col: usize) -> bool;

    /// Zero-based index of the first secondary column.
    ///
    /// The default marks every column as primary, which is the common case.
    fn first_secondary_col(&self) -> usize {
        self.cols()
    }
}

/// An in-memory [`Matrix`] storing one bit per entry.
///
/// # Example
/// ```
/// use dlx::{DenseMatrix, Matrix};
///
/// let m = DenseMatrix::new(&[
///     vec![true, false, true],
///     vec![false, true, false],
/// ])
/// .unwrap();
/// assert_eq!(m.rows(), 2);
/// assert_eq!(m.cols(), 3);
/// assert!(m.value(0, 2));
/// assert_eq!(m.first_secondary_col(), 3); // all columns primary
/// ```
#[derive(Clone, Debug)]
pub struct DenseMatrix {
    bits: Vec<BitVec>,
    cols: usize,
    first_secondary: usize,
}

impl DenseMatrix {
    /// Builds an instance in which every column is primary.
    ///
    /// Returns [`Error::RaggedRow`] if the rows are not all the same width.
    pub fn new<R: AsRef<[bool]>>(rows: &[R]) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        Self::with_secondary(rows, cols)
    }

    /// Builds an instance whose columns from `first_secondary` onward are
    /// secondary (covered at most once instead of exactly once).
    pub fn with_secondary<R: AsRef<[bool]>>(rows: &[R], first_secondary: usize) -> Result<Self> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(Error::RaggedRow {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
        }
        if first_secondary > cols {
            return Err(Error::SecondaryOutOfBounds {
                index: first_secondary,
                cols,
            });
        }
        let bits = rows
            .iter()
            .map(|row| row.as_ref().iter().copied().collect())
            .collect();
        Ok(DenseMatrix {
            bits,
            cols,
            first_secondary,
        })
    }
}

impl Matrix for DenseMatrix {
    fn rows(&self) -> usize {
        self.bits.len()
    }

    fn cols(&self) -> usize {
        self.cols
    }

    fn value(&self, row: usize, col: usize) -> bool {
        self.bits[row][col]
    }

    fn first_secondary_col(&self) -> usize {
        self.first_secondary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_ragged_rows() {
        let err = DenseMatrix::new(&[vec![true, false], vec![true]]).unwrap_err();
        assert_eq!(
            err,
            Error::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_rejects_secondary_out_of_bounds() {
        let err = DenseMatrix::with_secondary(&[vec![true, false]], 3).unwrap_err();
        assert_eq!(err, Error::SecondaryOutOfBounds { index: 3, cols: 2 });
    }

    #[test]
    fn test_secondary_boundary_roundtrip() {
        let m = DenseMatrix::with_secondary(&[vec![true, true, false]], 2).unwrap();
        assert_eq!(m.first_secondary_col(), 2);
        // The boundary may equal the column count: no secondary columns.
        let m = DenseMatrix::with_secondary(&[vec![true, true, false]], 3).unwrap();
        assert_eq!(m.first_secondary_col(), 3);
    }

    #[test]
    fn test_empty_matrix() {
        let m = DenseMatrix::new::<Vec<bool>>(&[]).unwrap();
        assert_eq!(m.rows(), 0);
        assert_eq!(m.cols(), 0);
        assert_eq!(m.first_secondary_col(), 0);
    }
}
