//! k-nearest-neighbors ranking and majority-vote classification.
//!
//! Distances from a query point to the fixed labeled dataset are ranked
//! ascending with a stable sort (ties keep dataset order), the top k
//! become the neighborhood, and the predicted label is the majority vote
//! among them.

pub mod dataset;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use dataset::{sample_dataset, FeatureStats};

use crate::error::{LabError, LabResult};

/// T-shirt size label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SizeLabel {
    M,
    L,
}

/// One labeled training point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledPoint {
    pub height: f64,
    pub weight: f64,
    pub label: SizeLabel,
}

/// The movable query point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryPoint {
    pub height: f64,
    pub weight: f64,
}

/// A dataset point with its distance to the query, in dataset order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoredPoint {
    pub point: LabeledPoint,
    /// Index into the original dataset.
    pub index: usize,
    pub distance: f64,
}

/// A selected neighbor with its 1-based rank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankedNeighbor {
    pub point: LabeledPoint,
    pub index: usize,
    pub rank: usize,
    pub distance: f64,
}

/// Full ranking outcome for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnnReport {
    /// Every dataset point scored, in dataset order (the scatter plot
    /// dims non-neighbors rather than hiding them).
    pub scored: Vec<ScoredPoint>,
    /// The k nearest, ascending by distance, ranks 1..=k.
    pub neighbors: Vec<RankedNeighbor>,
    pub votes_m: usize,
    pub votes_l: usize,
    pub prediction: SizeLabel,
    /// Set when the vote was split evenly; the prediction then falls back
    /// to M, matching the original behavior.
    pub tie: bool,
    /// Distance of the k-th neighbor — the decision-circle radius.
    pub radius: f64,
    /// The k actually used after clamping to the dataset size.
    pub effective_k: usize,
}

fn euclidean(ax: f64, ay: f64, bx: f64, by: f64) -> f64 {
    ((ax - bx).powi(2) + (ay - by).powi(2)).sqrt()
}

/// Rank the dataset around a query point and classify by majority vote.
///
/// `k` is clamped to the dataset size; `k == 0` (or an empty dataset) is
/// rejected because ranks and the decision radius would be undefined.
/// With `standardize`, both sides of every distance are z-scored with the
/// dataset's sample statistics first.
pub fn rank_neighbors(
    dataset: &[LabeledPoint],
    query: &QueryPoint,
    k: usize,
    standardize: bool,
) -> LabResult<KnnReport> {
    if k == 0 || dataset.is_empty() {
        return Err(LabError::IndexOutOfRange {
            what: "neighbor count k",
            index: k,
            limit: dataset.len(),
        });
    }
    let effective_k = k.min(dataset.len());

    let stats = FeatureStats::from_dataset(dataset);
    let (qh, qw) = if standardize {
        stats.standardize(query.height, query.weight)
    } else {
        (query.height, query.weight)
    };

    let scored: Vec<ScoredPoint> = dataset
        .iter()
        .enumerate()
        .map(|(index, &point)| {
            let (ph, pw) = if standardize {
                stats.standardize(point.height, point.weight)
            } else {
                (point.height, point.weight)
            };
            ScoredPoint {
                point,
                index,
                distance: euclidean(ph, pw, qh, qw),
            }
        })
        .collect();

    // Stable ascending sort: equal distances keep dataset order.
    let mut sorted = scored.clone();
    sorted.sort_by(|a, b| a.distance.total_cmp(&b.distance));

    let neighbors: Vec<RankedNeighbor> = sorted
        .iter()
        .take(effective_k)
        .enumerate()
        .map(|(i, s)| RankedNeighbor {
            point: s.point,
            index: s.index,
            rank: i + 1,
            distance: s.distance,
        })
        .collect();

    let votes_m = neighbors
        .iter()
        .filter(|n| n.point.label == SizeLabel::M)
        .count();
    let votes_l = neighbors.len() - votes_m;
    let tie = votes_m == votes_l;
    // Observed tie-break: an even split predicts M. The `tie` flag lets a
    // consumer surface the ambiguity instead.
    let prediction = if votes_m >= votes_l {
        SizeLabel::M
    } else {
        SizeLabel::L
    };
    let radius = neighbors.last().map_or(0.0, |n| n.distance);

    debug!(
        k = effective_k,
        standardize,
        votes_m,
        votes_l,
        tie,
        radius,
        "ranked neighborhood"
    );

    Ok(KnnReport {
        scored,
        neighbors,
        votes_m,
        votes_l,
        prediction,
        tie,
        radius,
        effective_k,
    })
}
