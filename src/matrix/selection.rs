//! View-vs-copy classification for matrix selections.
//!
//! The slicing widget demonstrates NumPy memory semantics: a contiguous
//! row range is a *view* over the backing storage (mutating it would
//! mutate the source), while fancy indexing and boolean masks allocate
//! independent *copies*. The classifier derives the highlight overlay and
//! the aliasing verdict without ever touching the source data.

use serde::Serialize;
use tracing::debug;

use crate::error::{LabError, LabResult};
use crate::matrix::Matrix;

/// One of the three selection forms the widget offers.
#[derive(Debug, Clone, PartialEq)]
pub enum Selection {
    /// Contiguous half-open row range, e.g. `a[1:2, :]`.
    Rows { start: usize, end: usize },
    /// Explicit row list, e.g. `a[[0, 2]]`. Always copies.
    RowList(Vec<usize>),
    /// Element-wise predicate, e.g. `a[a % 2 == 0]`. Always copies.
    Mask(fn(f64) -> bool),
}

/// Outcome of classifying a selection against a matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionReport {
    /// `(row, col)` cells the overlay highlights, row-major order.
    pub highlighted: Vec<(usize, usize)>,
    /// Whether mutating the selection would mutate the source.
    pub aliases_source: bool,
    /// Display label: "view" or "copy".
    pub label: &'static str,
}

/// Classify a selection: which cells it covers and whether it aliases
/// the source storage. Row indices beyond the matrix are rejected.
pub fn classify_selection(matrix: &Matrix, selection: &Selection) -> LabResult<SelectionReport> {
    let report = match selection {
        Selection::Rows { start, end } => {
            if *end > matrix.rows() || start > end {
                return Err(LabError::IndexOutOfRange {
                    what: "selection row",
                    index: (*end).max(*start),
                    limit: matrix.rows(),
                });
            }
            let highlighted = (*start..*end)
                .flat_map(|r| (0..matrix.cols()).map(move |c| (r, c)))
                .collect();
            SelectionReport {
                highlighted,
                aliases_source: true,
                label: "view",
            }
        }
        Selection::RowList(rows) => {
            let mut highlighted = Vec::new();
            for &r in rows {
                if r >= matrix.rows() {
                    return Err(LabError::IndexOutOfRange {
                        what: "selection row",
                        index: r,
                        limit: matrix.rows(),
                    });
                }
                highlighted.extend((0..matrix.cols()).map(|c| (r, c)));
            }
            SelectionReport {
                highlighted,
                aliases_source: false,
                label: "copy",
            }
        }
        Selection::Mask(predicate) => {
            let highlighted = matrix
                .cells()
                .filter(|&(_, _, v)| predicate(v))
                .map(|(r, c, _)| (r, c))
                .collect();
            SelectionReport {
                highlighted,
                aliases_source: false,
                label: "copy",
            }
        }
    };

    debug!(
        cells = report.highlighted.len(),
        aliases = report.aliases_source,
        "classified selection"
    );
    Ok(report)
}
