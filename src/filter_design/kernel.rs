use crate::error::Result;
use crate::signal_processing::{ConvolutionMode, convolve};

/// Even-symmetric FIR taps of odd length 2N+1
///
/// Built from half-coefficients `h[0..=N]` as `h[N], …, h[1], h[0], h[1], …, h[N]`,
/// so the filter is Type I linear phase with a group delay of N samples.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterKernel {
    taps: Vec<f64>,
}

impl FilterKernel {
    /// Mirror half-coefficients into a symmetric kernel
    ///
    /// An empty slice yields an empty kernel; every design produces at least
    /// one coefficient.
    pub fn from_half(half: &[f64]) -> Self {
        let mut taps = Vec::with_capacity(half.len() * 2);
        taps.extend(half.iter().skip(1).rev());
        taps.extend_from_slice(half);
        Self { taps }
    }

    pub fn taps(&self) -> &[f64] {
        &self.taps
    }

    pub fn into_taps(self) -> Vec<f64> {
        self.taps
    }

    /// Get the number of taps (filter length)
    pub fn num_taps(&self) -> usize {
        self.taps.len()
    }

    /// Tap order N
    pub fn order(&self) -> usize {
        self.taps.len().saturating_sub(1) / 2
    }

    /// Get the group delay in samples (half the filter length for linear phase)
    pub fn group_delay_samples(&self) -> usize {
        self.order()
    }

    /// Half-coefficients `h[0..=N]` (center tap first)
    pub fn half_coefficients(&self) -> &[f64] {
        &self.taps[self.order()..]
    }

    /// Exact tap symmetry `taps[i] == taps[len − 1 − i]`
    pub fn is_symmetric(&self) -> bool {
        self.taps.iter().eq(self.taps.iter().rev())
    }

    /// Convolve `signal` with this kernel
    pub fn apply(&self, signal: &[f64], mode: ConvolutionMode) -> Result<Vec<f64>> {
        convolve(signal, &self.taps, mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_half_mirrors_coefficients() {
        let kernel = FilterKernel::from_half(&[0.5, 0.2, 0.1]);
        assert_eq!(kernel.taps(), &[0.1, 0.2, 0.5, 0.2, 0.1]);
        assert_eq!(kernel.num_taps(), 5);
        assert_eq!(kernel.order(), 2);
        assert_eq!(kernel.group_delay_samples(), 2);
        assert_eq!(kernel.half_coefficients(), &[0.5, 0.2, 0.1]);
        assert!(kernel.is_symmetric());
    }

    #[test]
    fn test_single_coefficient() {
        let kernel = FilterKernel::from_half(&[0.75]);
        assert_eq!(kernel.taps(), &[0.75]);
        assert_eq!(kernel.order(), 0);
        assert!(kernel.is_symmetric());
    }

    #[test]
    fn test_apply_impulse_returns_taps() {
        let kernel = FilterKernel::from_half(&[0.5, 0.25]);
        let out = kernel.apply(&[1.0], ConvolutionMode::Full).unwrap();
        assert_eq!(out, vec![0.25, 0.5, 0.25]);
    }
}
