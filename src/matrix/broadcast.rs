//! NumPy-style broadcasting over shape sequences.
//!
//! Shapes are compared from the trailing axis backward; a missing or
//! size-1 axis stretches to match its partner, anything else is a
//! `ShapeMismatch`. The widget only demos the (3,1)+(1,4) case but the
//! rule is N-dimensional.

use crate::error::{LabError, LabResult};
use crate::matrix::Matrix;

/// Compute the broadcast result shape of two shape sequences.
///
/// For each aligned axis pair `(a, b)` (aligned from the trailing end,
/// absent axes treated as 1): result is `b` if `a == 1`, `a` if `b == 1`,
/// `a` if `a == b`, otherwise the shapes are incompatible.
pub fn broadcast_shape(left: &[usize], right: &[usize]) -> LabResult<Vec<usize>> {
    let ndim = left.len().max(right.len());
    let mut result = vec![0; ndim];

    for axis in 0..ndim {
        // Axis 0 here is the trailing axis of both shapes; shorter shapes
        // behave as if left-padded with 1s.
        let a = if axis < left.len() {
            left[left.len() - 1 - axis]
        } else {
            1
        };
        let b = if axis < right.len() {
            right[right.len() - 1 - axis]
        } else {
            1
        };

        let dim = if a == b || b == 1 {
            a
        } else if a == 1 {
            b
        } else {
            return Err(LabError::ShapeMismatch {
                left: left.to_vec(),
                right: right.to_vec(),
                axis,
                lhs: a,
                rhs: b,
            });
        };
        result[ndim - 1 - axis] = dim;
    }

    Ok(result)
}

/// Element-wise addition of two 2-D matrices under broadcasting.
///
/// Implements the widget's worked example: (3,1) + (1,4) → (3,4) where
/// every output cell `(i, j)` is `a[i, 0] + b[0, j]`.
pub fn broadcast_add(a: &Matrix, b: &Matrix) -> LabResult<Matrix> {
    let shape = broadcast_shape(&a.shape(), &b.shape())?;
    let (rows, cols) = (shape[0], shape[1]);

    Ok(Matrix::from_fn(rows, cols, |r, c| {
        let av = a.get(r % a.rows(), c % a.cols());
        let bv = b.get(r % b.rows(), c % b.cols());
        av + bv
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worked_example_shape() {
        assert_eq!(broadcast_shape(&[3, 1], &[1, 4]).unwrap(), vec![3, 4]);
    }

    #[test]
    fn test_equal_shapes_pass_through() {
        assert_eq!(broadcast_shape(&[2, 3], &[2, 3]).unwrap(), vec![2, 3]);
    }

    #[test]
    fn test_rank_extension() {
        // A trailing-aligned missing axis behaves as size 1.
        assert_eq!(broadcast_shape(&[5, 2, 3], &[3]).unwrap(), vec![5, 2, 3]);
        assert_eq!(broadcast_shape(&[4], &[3, 1]).unwrap(), vec![3, 4]);
    }

    #[test]
    fn test_incompatible_shapes_fail() {
        let err = broadcast_shape(&[2, 3], &[4, 5]).unwrap_err();
        match err {
            LabError::ShapeMismatch { axis, lhs, rhs, .. } => {
                assert_eq!(axis, 0, "trailing axis should be reported first");
                assert_eq!((lhs, rhs), (3, 5));
            }
            other => panic!("expected ShapeMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_broadcast_add_pairing() {
        let a = Matrix::from_rows(vec![vec![1.0], vec![2.0], vec![3.0]]).unwrap();
        let b = Matrix::from_rows(vec![vec![10.0, 20.0, 30.0, 40.0]]).unwrap();
        let sum = broadcast_add(&a, &b).unwrap();

        assert_eq!(sum.shape(), [3, 4]);
        for r in 0..3 {
            for c in 0..4 {
                assert_eq!(
                    sum.get(r, c),
                    a.get(r, 0) + b.get(0, c),
                    "cell ({r},{c}) must pair A's row value with B's column value"
                );
            }
        }
    }
}
