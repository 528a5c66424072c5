//! Crate-wide error type.
//!
//! UI inputs are pre-clamped by the widget layer, so most of these are
//! unreachable through normal interaction; the numeric core still
//! validates its inputs because it is also consumed directly by tests
//! and by embedders that bypass the widgets.

use thiserror::Error;

/// Errors produced by the numeric core.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LabError {
    /// Two shapes cannot be broadcast together. Reported before any
    /// element is computed; names both shapes and the offending axis
    /// (counted from the trailing end, zero-based).
    #[error("cannot broadcast {left:?} against {right:?}: trailing axis {axis} has extents {lhs} and {rhs}")]
    ShapeMismatch {
        left: Vec<usize>,
        right: Vec<usize>,
        axis: usize,
        lhs: usize,
        rhs: usize,
    },

    /// The marginal evidence probability is zero (or negative), so the
    /// posterior is undefined. Surfaced instead of letting NaN/Inf reach
    /// a display value.
    #[error("marginal evidence probability must be positive, got {marginal}")]
    DivisionByZero { marginal: f64 },

    /// An index-like input exceeds what the data can satisfy: a selection
    /// row outside the matrix, a kernel larger than its source, or a
    /// neighbor count of zero.
    #[error("{what} {index} out of range (limit {limit})")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        limit: usize,
    },

    /// Matrix constructor input rows have unequal lengths.
    #[error("ragged matrix input: row {row} has {found} columns, expected {expected}")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A parameter name not declared by the widget's parameter set.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// A feature or feature value absent from the naive Bayes table.
    #[error("unknown category '{value}' for feature '{feature}'")]
    UnknownCategory { feature: String, value: String },
}

/// Convenience alias used throughout the numeric core.
pub type LabResult<T> = Result<T, LabError>;
