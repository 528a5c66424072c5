//! Broadcasting and convolution scenario tests
//!
//! Run with: cargo test --test numeric_tests

use ml_lab::convolution::{convolve, ConvolutionSettings, KernelPreset};
use ml_lab::error::LabError;
use ml_lab::matrix::{broadcast_add, broadcast_shape, demo_image, demo_matrix, Matrix};

#[test]
fn test_broadcast_worked_example_values() {
    // (3,1) + (1,4) → (3,4); every cell (i,j) = A[i][0] + B[0][j]
    let a = Matrix::from_rows(vec![vec![0.0], vec![4.0], vec![8.0]]).unwrap();
    let b = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0, 4.0]]).unwrap();

    let result = broadcast_add(&a, &b).unwrap();
    assert_eq!(result.shape(), [3, 4]);
    assert_eq!(
        result.to_rows(),
        vec![
            vec![1.0, 2.0, 3.0, 4.0],
            vec![5.0, 6.0, 7.0, 8.0],
            vec![9.0, 10.0, 11.0, 12.0],
        ]
    );
}

#[test]
fn test_broadcast_incompatible_shapes_diagnostic() {
    let err = broadcast_shape(&[2, 3], &[4, 5]).unwrap_err();
    assert!(matches!(err, LabError::ShapeMismatch { .. }));
    // The diagnostic must name both shapes.
    let message = err.to_string();
    assert!(message.contains("[2, 3]"), "got: {message}");
    assert!(message.contains("[4, 5]"), "got: {message}");
}

#[test]
fn test_broadcast_is_symmetric() {
    let forward = broadcast_shape(&[3, 1], &[1, 4]).unwrap();
    let backward = broadcast_shape(&[1, 4], &[3, 1]).unwrap();
    assert_eq!(forward, backward);
}

#[test]
fn test_identity_convolution_is_a_cropped_copy() {
    // Any source, not just the demo image.
    let source = demo_matrix();
    let out = convolve(
        &source,
        &KernelPreset::Identity.matrix(),
        &ConvolutionSettings::default(),
    )
    .unwrap();

    assert_eq!(out.shape(), [2, 2]);
    for r in 0..2 {
        for c in 0..2 {
            assert_eq!(out.get(r, c), source.get(r + 1, c + 1));
        }
    }
}

#[test]
fn test_feature_map_dimensions_follow_valid_convolution() {
    let source = demo_image();
    for preset in KernelPreset::ALL {
        let out = convolve(&source, &preset.matrix(), &ConvolutionSettings::default()).unwrap();
        assert_eq!(
            out.shape(),
            [6, 6],
            "8x8 source with 3x3 {} kernel must give 6x6",
            preset.name()
        );
    }
}

#[test]
fn test_sobel_pair_is_a_rotation_of_each_other() {
    // Sobel-Y responds to horizontal edges exactly as strongly as Sobel-X
    // responds to vertical ones; on the symmetric demo block the total
    // response magnitude matches.
    let source = demo_image();
    let x = convolve(
        &source,
        &KernelPreset::SobelX.matrix(),
        &ConvolutionSettings::default(),
    )
    .unwrap();
    let y = convolve(
        &source,
        &KernelPreset::SobelY.matrix(),
        &ConvolutionSettings::default(),
    )
    .unwrap();

    let total_x: f64 = x.cells().map(|(_, _, v)| v).sum();
    let total_y: f64 = y.cells().map(|(_, _, v)| v).sum();
    assert!((total_x - total_y).abs() < 1e-9);
}

#[test]
fn test_laplacian_marks_all_edges() {
    let out = convolve(
        &demo_image(),
        &KernelPreset::Laplacian.matrix(),
        &ConvolutionSettings::default(),
    )
    .unwrap();

    // A window straddling the block's corner responds; the flat interior
    // cancels out.
    assert_eq!(out.get(1, 1), 200.0);
    assert_eq!(out.get(3, 3), 0.0, "flat interior has zero Laplacian");
}
