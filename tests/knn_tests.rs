//! k-NN ranking scenario tests
//!
//! Run with: cargo test --test knn_tests

use ml_lab::knn::{rank_neighbors, sample_dataset, FeatureStats, QueryPoint, SizeLabel};

fn opening_query() -> QueryPoint {
    QueryPoint {
        height: 161.0,
        weight: 61.0,
    }
}

#[test]
fn test_opening_scenario_is_reproducible() {
    // Query (161, 61), k = 5, raw distances — the widget's mount state.
    let data = sample_dataset();
    let a = rank_neighbors(&data, &opening_query(), 5, false).unwrap();
    let b = rank_neighbors(&data, &opening_query(), 5, false).unwrap();
    assert_eq!(a, b, "ranking must be deterministic");

    assert_eq!(a.votes_m, 4);
    assert_eq!(a.votes_l, 1);
    assert_eq!(a.prediction, SizeLabel::M);

    let ranks: Vec<usize> = a.neighbors.iter().map(|n| n.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_decision_radius_grows_with_k() {
    let data = sample_dataset();
    let radii: Vec<f64> = (1..=15)
        .map(|k| {
            rank_neighbors(&data, &opening_query(), k, false)
                .unwrap()
                .radius
        })
        .collect();

    for pair in radii.windows(2) {
        assert!(
            pair[1] >= pair[0],
            "radius must never shrink as k grows: {radii:?}"
        );
    }
}

#[test]
fn test_every_point_is_scored_for_the_scatter_plot() {
    let data = sample_dataset();
    let report = rank_neighbors(&data, &opening_query(), 3, false).unwrap();

    assert_eq!(report.scored.len(), data.len());
    // Scored list stays in dataset order regardless of distance.
    for (i, s) in report.scored.iter().enumerate() {
        assert_eq!(s.index, i);
    }
    // Neighbors are a subset of the scored points.
    for n in &report.neighbors {
        let s = &report.scored[n.index];
        assert_eq!(s.distance, n.distance);
    }
}

#[test]
fn test_standardization_uses_dataset_statistics() {
    let data = sample_dataset();
    let stats = FeatureStats::from_dataset(&data);

    // A query at the dataset mean has a standardized distance to each
    // point equal to that point's own z-norm.
    let query = QueryPoint {
        height: stats.mean_height,
        weight: stats.mean_weight,
    };
    let report = rank_neighbors(&data, &query, 1, true).unwrap();

    let nearest = &report.neighbors[0];
    let (zh, zw) = stats.standardize(nearest.point.height, nearest.point.weight);
    let expected = (zh * zh + zw * zw).sqrt();
    assert!((nearest.distance - expected).abs() < 1e-12);
}

#[test]
fn test_prediction_flips_across_the_class_boundary() {
    let data = sample_dataset();

    let deep_m = QueryPoint {
        height: 158.0,
        weight: 58.0,
    };
    let deep_l = QueryPoint {
        height: 170.0,
        weight: 67.0,
    };

    let m_report = rank_neighbors(&data, &deep_m, 5, false).unwrap();
    let l_report = rank_neighbors(&data, &deep_l, 5, false).unwrap();
    assert_eq!(m_report.prediction, SizeLabel::M);
    assert_eq!(l_report.prediction, SizeLabel::L);
}

#[test]
fn test_full_dataset_vote_is_the_global_majority() {
    // k = dataset size degenerates to counting labels: 7 M vs 11 L.
    let data = sample_dataset();
    let report = rank_neighbors(&data, &opening_query(), 18, false).unwrap();
    assert_eq!(report.votes_m, 7);
    assert_eq!(report.votes_l, 11);
    assert_eq!(report.prediction, SizeLabel::L);
    assert!(!report.tie);
}
