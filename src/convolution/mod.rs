//! 2D convolution engine for the filter-lab widget.
//!
//! Valid (no-padding) convolution with stride 1: a k×k kernel slides
//! over the source and each output cell is the weighted sum of the
//! window under it. The widget displays outputs as pixel intensities, so
//! the default settings take the absolute value of each sum and clamp it
//! to [0, 255]; both steps are parameterized for non-display use.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LabError, LabResult};
use crate::matrix::Matrix;

/// Post-processing applied to every raw convolution sum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConvolutionSettings {
    /// Take `|sum|` before clamping. Models intensity display, where the
    /// sign of an edge response is irrelevant.
    pub take_abs: bool,
    /// Lower clamp bound.
    pub clamp_min: f64,
    /// Upper clamp bound.
    pub clamp_max: f64,
}

impl Default for ConvolutionSettings {
    fn default() -> Self {
        Self {
            take_abs: true,
            clamp_min: 0.0,
            clamp_max: 255.0,
        }
    }
}

/// The named 3×3 kernels the widget offers as one-click presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KernelPreset {
    SobelX,
    SobelY,
    Laplacian,
    Identity,
}

impl KernelPreset {
    /// All presets, in the order the widget lists them.
    pub const ALL: [KernelPreset; 4] = [
        KernelPreset::SobelX,
        KernelPreset::SobelY,
        KernelPreset::Laplacian,
        KernelPreset::Identity,
    ];

    /// Display name.
    pub fn name(&self) -> &'static str {
        match self {
            KernelPreset::SobelX => "Sobel-X",
            KernelPreset::SobelY => "Sobel-Y",
            KernelPreset::Laplacian => "Laplacian",
            KernelPreset::Identity => "Identity",
        }
    }

    /// The preset's 3×3 weights.
    pub fn matrix(&self) -> Matrix {
        let w: [[f64; 3]; 3] = match self {
            KernelPreset::SobelX => [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]],
            KernelPreset::SobelY => [[1.0, 2.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -2.0, -1.0]],
            KernelPreset::Laplacian => [[0.0, 1.0, 0.0], [1.0, -4.0, 1.0], [0.0, 1.0, 0.0]],
            KernelPreset::Identity => [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]],
        };
        Matrix::from_fn(3, 3, |r, c| w[r][c])
    }
}

/// Convolve `source` with a square `kernel` (valid mode, stride 1).
///
/// Output dimensions are `(rows - k + 1) × (cols - k + 1)`. Non-square
/// kernels and kernels that do not fit inside the source are rejected.
pub fn convolve(
    source: &Matrix,
    kernel: &Matrix,
    settings: &ConvolutionSettings,
) -> LabResult<Matrix> {
    let k = kernel.rows();
    if kernel.cols() != k {
        return Err(LabError::IndexOutOfRange {
            what: "kernel column count",
            index: kernel.cols(),
            limit: k,
        });
    }
    if k == 0 || k > source.rows() || k > source.cols() {
        return Err(LabError::IndexOutOfRange {
            what: "kernel size",
            index: k,
            limit: source.rows().min(source.cols()),
        });
    }

    let out_rows = source.rows() - k + 1;
    let out_cols = source.cols() - k + 1;

    let output = Matrix::from_fn(out_rows, out_cols, |r, c| {
        let mut sum = 0.0;
        for dr in 0..k {
            for dc in 0..k {
                sum += source.get(r + dr, c + dc) * kernel.get(dr, dc);
            }
        }
        let value = if settings.take_abs { sum.abs() } else { sum };
        value.clamp(settings.clamp_min, settings.clamp_max)
    });

    debug!(
        out_rows,
        out_cols,
        kernel = k,
        "computed feature map"
    );
    Ok(output)
}
