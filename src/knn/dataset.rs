//! The fixed height/weight teaching dataset and its summary statistics.

use serde::{Deserialize, Serialize};

use crate::knn::{LabeledPoint, SizeLabel};

/// Per-dimension mean and standard deviation used for z-score
/// standardization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub mean_height: f64,
    pub mean_weight: f64,
    pub std_height: f64,
    pub std_weight: f64,
}

impl FeatureStats {
    /// Compute sample statistics (n−1 denominator) over a dataset.
    pub fn from_dataset(points: &[LabeledPoint]) -> Self {
        let n = points.len() as f64;
        if points.len() < 2 {
            return Self {
                mean_height: points.first().map_or(0.0, |p| p.height),
                mean_weight: points.first().map_or(0.0, |p| p.weight),
                std_height: 1.0,
                std_weight: 1.0,
            };
        }

        let mean_height = points.iter().map(|p| p.height).sum::<f64>() / n;
        let mean_weight = points.iter().map(|p| p.weight).sum::<f64>() / n;
        let var = |f: fn(&LabeledPoint) -> f64, mean: f64| {
            points.iter().map(|p| (f(p) - mean).powi(2)).sum::<f64>() / (n - 1.0)
        };

        Self {
            mean_height,
            mean_weight,
            std_height: var(|p| p.height, mean_height).sqrt(),
            std_weight: var(|p| p.weight, mean_weight).sqrt(),
        }
    }

    /// Standardize a raw `(height, weight)` pair.
    pub fn standardize(&self, height: f64, weight: f64) -> (f64, f64) {
        (
            (height - self.mean_height) / self.std_height,
            (weight - self.mean_weight) / self.std_weight,
        )
    }
}

/// The 18-point T-shirt sizing dataset (height cm, weight kg → M/L).
pub fn sample_dataset() -> Vec<LabeledPoint> {
    const RAW: [(f64, f64, SizeLabel); 18] = [
        (158.0, 58.0, SizeLabel::M),
        (158.0, 59.0, SizeLabel::M),
        (158.0, 63.0, SizeLabel::M),
        (160.0, 59.0, SizeLabel::M),
        (160.0, 60.0, SizeLabel::M),
        (163.0, 60.0, SizeLabel::M),
        (163.0, 61.0, SizeLabel::M),
        (160.0, 64.0, SizeLabel::L),
        (163.0, 64.0, SizeLabel::L),
        (165.0, 61.0, SizeLabel::L),
        (165.0, 62.0, SizeLabel::L),
        (165.0, 65.0, SizeLabel::L),
        (168.0, 62.0, SizeLabel::L),
        (168.0, 63.0, SizeLabel::L),
        (168.0, 66.0, SizeLabel::L),
        (170.0, 63.0, SizeLabel::L),
        (170.0, 64.0, SizeLabel::L),
        (170.0, 68.0, SizeLabel::L),
    ];

    RAW.iter()
        .map(|&(height, weight, label)| LabeledPoint {
            height,
            weight,
            label,
        })
        .collect()
}
