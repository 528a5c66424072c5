//! Dense matrix storage and the demo fixtures the widgets start from.
//!
//! Everything in the lab operates on tiny rectangles (4×4 demo matrix,
//! 8×8 image, 3×3 kernels), so storage is a flat row-major `Vec<f64>`
//! with no view machinery — aliasing semantics are *modelled* by the
//! selection classifier, not implemented here.

use serde::{Deserialize, Serialize};

use crate::error::{LabError, LabResult};

/// A dense row-major matrix of `f64` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Build a matrix from nested rows. Rows must all have the same length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> LabResult<Self> {
        let expected = rows.first().map(Vec::len).unwrap_or(0);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != expected {
                return Err(LabError::RaggedMatrix {
                    row: i,
                    expected,
                    found: row.len(),
                });
            }
        }
        Ok(Self {
            rows: rows.len(),
            cols: expected,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// Build a matrix by evaluating `f(row, col)` for every cell.
    pub fn from_fn(rows: usize, cols: usize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                data.push(f(r, c));
            }
        }
        Self { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Shape as `[rows, cols]`, the form the broadcast rule consumes.
    pub fn shape(&self) -> [usize; 2] {
        [self.rows, self.cols]
    }

    /// Value at `(row, col)`. Panics on out-of-range coordinates, which
    /// callers guard by construction (all loops run over `self` bounds).
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    /// Overwrite the value at `(row, col)` if it is in range.
    pub fn set(&mut self, row: usize, col: usize, value: f64) -> LabResult<()> {
        if row >= self.rows {
            return Err(LabError::IndexOutOfRange {
                what: "matrix row",
                index: row,
                limit: self.rows,
            });
        }
        if col >= self.cols {
            return Err(LabError::IndexOutOfRange {
                what: "matrix column",
                index: col,
                limit: self.cols,
            });
        }
        self.data[row * self.cols + col] = value;
        Ok(())
    }

    /// Iterate cells in row-major order as `(row, col, value)`.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data
            .iter()
            .enumerate()
            .map(|(i, &v)| (i / self.cols, i % self.cols, v))
    }

    /// Copy out the nested-row representation (handy for assertions and
    /// for the JSON snapshots).
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows)
            .map(|r| (0..self.cols).map(|c| self.get(r, c)).collect())
            .collect()
    }
}

/// The 4×4 counting matrix (`value = row * 4 + col`) the slicing widget
/// highlights against.
pub fn demo_matrix() -> Matrix {
    Matrix::from_fn(4, 4, |r, c| (r * 4 + c) as f64)
}

/// The 8×8 demo image: black background with a 100-intensity 4×4 square
/// at rows/cols 2..6. Every kernel preset produces a recognizable edge
/// map from it.
pub fn demo_image() -> Matrix {
    Matrix::from_fn(8, 8, |r, c| {
        if (2..6).contains(&r) && (2..6).contains(&c) {
            100.0
        } else {
            0.0
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rows_rejects_ragged_input() {
        let result = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]);
        assert_eq!(
            result,
            Err(LabError::RaggedMatrix {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_demo_matrix_counts_row_major() {
        let m = demo_matrix();
        assert_eq!(m.shape(), [4, 4]);
        assert_eq!(m.get(0, 0), 0.0);
        assert_eq!(m.get(1, 2), 6.0);
        assert_eq!(m.get(3, 3), 15.0);
    }

    #[test]
    fn test_demo_image_block() {
        let img = demo_image();
        assert_eq!(img.shape(), [8, 8]);
        assert_eq!(img.get(0, 0), 0.0);
        assert_eq!(img.get(2, 2), 100.0);
        assert_eq!(img.get(5, 5), 100.0);
        assert_eq!(img.get(6, 6), 0.0);
    }

    #[test]
    fn test_set_bounds_checked() {
        let mut m = Matrix::zeros(2, 2);
        assert!(m.set(1, 1, 5.0).is_ok());
        assert_eq!(m.get(1, 1), 5.0);
        assert!(matches!(
            m.set(2, 0, 1.0),
            Err(LabError::IndexOutOfRange { .. })
        ));
    }
}
