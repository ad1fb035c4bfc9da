use std::f64::consts::PI;

use approx::assert_abs_diff_eq;
use linphase::config::{FilterSpec, NormOrder};
use linphase::filter_design::{
    BandSpec, BasisMatrix, DesiredResponse, FilterDesigner, FrequencyGrid, sample_bands,
};
use linphase::signal_processing::{ConvolutionMode, magnitude_response_db};
use linphase::{DesignError, FilterKernel};

fn spec(order: usize, norm: NormOrder) -> FilterSpec {
    FilterSpec {
        order,
        norm,
        ..Default::default()
    }
}

fn lowpass_bands() -> [BandSpec; 2] {
    [BandSpec::new(0.0, 0.1, 0.0), BandSpec::new(0.2, 0.5, -40.0)]
}

/// Best constant approximation of `desired` under each norm
#[test]
fn test_order_zero_fits_best_constant() {
    let desired = [0.9, 2.5, 1.1, 7.0, 1.6];
    let w = [0.0, 0.5, 1.0, 2.0, 3.0];

    let cases = [
        (NormOrder::L1, 1.6),            // median
        (NormOrder::L2, 13.1 / 5.0),     // mean
        (NormOrder::Inf, (0.9 + 7.0) / 2.0), // mid-range
    ];

    for (norm, expected) in cases {
        let mut designer = FilterDesigner::new(spec(0, norm));
        let design = designer.design_from_slices(&w, &desired).unwrap();

        assert_eq!(design.kernel().num_taps(), 1);
        assert_abs_diff_eq!(design.half_coefficients()[0], expected, epsilon = 1e-5);
    }
}

#[test]
fn test_order_zero_basis_is_column_of_ones() {
    let basis = BasisMatrix::new(&[0.1, 0.7, 2.9], 0);
    assert_eq!(basis.num_coefficients(), 1);
    assert!((0..3).all(|i| basis.get(i, 0) == 1.0));
}

#[test]
fn test_kernel_is_odd_length_and_symmetric() {
    let (grid, desired) = sample_bands(128, &lowpass_bands()).unwrap();

    for norm in [NormOrder::L1, NormOrder::L2, NormOrder::Inf] {
        for order in [1, 4, 10] {
            let mut designer = FilterDesigner::new(spec(order, norm));
            let design = designer.design(&grid, &desired).unwrap();
            let taps = design.kernel().taps();

            assert_eq!(taps.len(), 2 * order + 1);
            for i in 0..taps.len() {
                assert_eq!(taps[i], taps[2 * order - i], "norm {} order {}", norm, order);
            }
        }
    }
}

#[test]
fn test_least_squares_round_trip_recovers_kernel() {
    let half = [0.4, 0.2, -0.05, 0.01];
    let grid = FrequencyGrid::uniform(64).unwrap();
    let target = BasisMatrix::new(grid.as_slice(), 3).evaluate(&half);
    let desired = DesiredResponse::new(target).unwrap();

    let mut designer = FilterDesigner::new(spec(3, NormOrder::L2));
    let design = designer.design(&grid, &desired).unwrap();

    for (got, want) in design.half_coefficients().iter().zip(half) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-6);
    }
    assert_eq!(design.kernel(), &FilterKernel::from_half(design.half_coefficients()));
    assert!(design.residual_norm() < 1e-6);
}

#[test]
fn test_weighting_rejects_zero_desired() {
    let grid = FrequencyGrid::uniform(4).unwrap();
    let desired = DesiredResponse::new(vec![1.0, 1.0, 0.0, 0.0]).unwrap();
    let mut designer = FilterDesigner::new(FilterSpec {
        order: 2,
        weighted: true,
        ..Default::default()
    });

    let err = designer.design(&grid, &desired).unwrap_err();
    assert!(matches!(err, DesignError::InvalidConfiguration(_)));
    assert!(designer.current().is_none());
}

#[test]
fn test_unweighted_accepts_zero_desired() {
    let grid = FrequencyGrid::uniform(32).unwrap();
    let desired = DesiredResponse::new(
        grid.as_slice()
            .iter()
            .map(|&w| if w < PI / 4.0 { 1.0 } else { 0.0 })
            .collect(),
    )
    .unwrap();
    let mut designer = FilterDesigner::new(spec(6, NormOrder::L1));
    assert!(designer.design(&grid, &desired).is_ok());
}

#[test]
fn test_mismatched_lengths_are_rejected() {
    let mut designer = FilterDesigner::new(FilterSpec::default());
    let err = designer
        .design_from_slices(&[0.0, 1.0, 2.0], &[1.0, 1.0])
        .unwrap_err();
    assert!(matches!(err, DesignError::InvalidConfiguration(_)));
}

#[test]
fn test_apply_before_design_is_precondition_error() {
    let designer = FilterDesigner::new(FilterSpec::default());
    let err = designer
        .apply(&[1.0, 2.0, 3.0], ConvolutionMode::Same)
        .unwrap_err();
    assert!(matches!(err, DesignError::UsedBeforeDesigned(_)));
}

#[test]
fn test_apply_same_keeps_signal_length() {
    let (grid, desired) = sample_bands(64, &lowpass_bands()).unwrap();
    let mut designer = FilterDesigner::new(spec(8, NormOrder::L2));
    designer.design(&grid, &desired).unwrap();

    for len in [17, 100, 1001] {
        let signal: Vec<f64> = (0..len).map(|i| (i as f64 * 0.2).cos()).collect();
        let out = designer.apply(&signal, ConvolutionMode::Same).unwrap();
        assert_eq!(out.len(), len);
    }

    let out = designer.apply(&[1.0; 40], ConvolutionMode::Full).unwrap();
    assert_eq!(out.len(), 40 + 17 - 1);
    let out = designer.apply(&[1.0; 40], ConvolutionMode::Valid).unwrap();
    assert_eq!(out.len(), 40 - 17 + 1);
}

#[test]
fn test_unit_impulse_response_is_zero_db() {
    for fft_points in [8, 100, 256, 1000] {
        let db = magnitude_response_db(&[1.0], fft_points).unwrap();
        assert_eq!(db.len(), fft_points / 2);
        assert!(db.iter().all(|v| v.abs() < 1e-9));
    }
}

#[test]
fn test_design_diagnostics_use_design_fft_points() {
    let (grid, desired) = sample_bands(64, &lowpass_bands()).unwrap();
    let mut designer = FilterDesigner::new(spec(8, NormOrder::L2));
    let design = designer.design(&grid, &desired).unwrap();

    assert_eq!(design.fft_points(), 2 * desired.len());
    let db = design.magnitude_response_db(None).unwrap();
    assert_eq!(db.len(), desired.len());

    let db = designer.magnitude_response_db(Some(512)).unwrap();
    assert_eq!(db.len(), 256);
}

#[test]
fn test_weighted_minimax_lowpass_meets_stopband() {
    let (grid, desired) = sample_bands(256, &lowpass_bands()).unwrap();
    let mut designer = FilterDesigner::new(FilterSpec {
        order: 20,
        norm: NormOrder::Inf,
        weighted: true,
        ..Default::default()
    });
    let design = designer.design(&grid, &desired).unwrap();

    // Passband edge at 0.1 cycles/sample is bin 51, stopband starts at bin 103
    let db = design.magnitude_response_db(Some(512)).unwrap();
    assert!(db[0].abs() < 1.0, "DC gain {} dB", db[0]);
    for (k, v) in db.iter().enumerate().skip(103) {
        assert!(*v < -30.0, "bin {} at {} dB", k, v);
    }
}

#[test]
fn test_penalize_flag_has_no_effect() {
    let (grid, desired) = sample_bands(64, &lowpass_bands()).unwrap();

    let mut plain = FilterDesigner::new(spec(6, NormOrder::L2));
    let mut penalized = FilterDesigner::new(FilterSpec {
        penalize: true,
        ..spec(6, NormOrder::L2)
    });

    let a = plain.design(&grid, &desired).unwrap().kernel().clone();
    let b = penalized.design(&grid, &desired).unwrap().kernel().clone();
    for (x, y) in a.taps().iter().zip(b.taps()) {
        assert_abs_diff_eq!(*x, *y, epsilon = 1e-9);
    }
}

#[test]
fn test_norms_minimize_their_own_objective() {
    let (grid, desired) = sample_bands(96, &lowpass_bands()).unwrap();
    let basis = BasisMatrix::new(grid.as_slice(), 6);

    let designs: Vec<_> = [NormOrder::L1, NormOrder::L2, NormOrder::Inf]
        .into_iter()
        .map(|norm| {
            let mut designer = FilterDesigner::new(spec(6, norm));
            designer.design(&grid, &desired).unwrap();
            designer.take_design().unwrap()
        })
        .collect();

    for design in &designs {
        let own = design.residual_norm();
        for other in &designs {
            let residual = basis.residual(desired.as_slice(), other.half_coefficients());
            let cross = design.norm().evaluate(&residual);
            assert!(
                own <= cross * (1.0 + 1e-5) + 1e-8,
                "L{} design has objective {} but L{} design scores {}",
                design.norm(),
                own,
                other.norm(),
                cross
            );
        }
    }
}
