use num_complex::Complex64;
use rustfft::FftPlanner;

use crate::error::{DesignError, Result};

/// Convert decibels to linear magnitude: `10^(x/20)`
pub fn db2mag(x: f64) -> f64 {
    10.0_f64.powf(x / 20.0)
}

/// Convert linear magnitude to decibels: `20·log10(x)`
///
/// Zero maps to `-inf`.
pub fn mag2db(x: f64) -> f64 {
    20.0 * x.log10()
}

/// Magnitude of the `fft_points`-point DFT of `x`
///
/// `x` is zero-padded or truncated to `fft_points`. All bins are returned.
///
/// # Errors
/// Returns `DesignError::InvalidConfiguration` if `fft_points` is zero
pub fn fft_magnitude(x: &[f64], fft_points: usize) -> Result<Vec<f64>> {
    if fft_points == 0 {
        return Err(DesignError::InvalidConfiguration(
            "fft_points must be positive".to_string(),
        ));
    }

    let mut buffer: Vec<Complex64> = x
        .iter()
        .take(fft_points)
        .map(|&v| Complex64::new(v, 0.0))
        .collect();
    buffer.resize(fft_points, Complex64::new(0.0, 0.0));

    let mut planner = FftPlanner::<f64>::new();
    let fft = planner.plan_fft_forward(fft_points);
    fft.process(&mut buffer);

    Ok(buffer.iter().map(|c| c.norm()).collect())
}

/// One-sided log-magnitude spectrum of `x` in dB
///
/// Returns the first `floor(fft_points / 2)` bins of `20·log10(|DFT(x)|)`.
/// Bins with zero magnitude come out as `-inf`; they are not clamped.
///
/// # Errors
/// Returns `DesignError::InvalidConfiguration` if `fft_points` is zero
pub fn magnitude_response_db(x: &[f64], fft_points: usize) -> Result<Vec<f64>> {
    let magnitude = fft_magnitude(x, fft_points)?;
    Ok(magnitude
        .iter()
        .take(fft_points / 2)
        .map(|&m| mag2db(m))
        .collect())
}
