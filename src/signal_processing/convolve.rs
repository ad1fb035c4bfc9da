use serde::{Deserialize, Serialize};

use crate::error::{DesignError, Result};

/// Output length convention for linear convolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConvolutionMode {
    /// Every overlap position, length `L + K − 1`
    Full,
    /// Length `max(L, K)`, centered on the full output
    #[default]
    Same,
    /// Only positions where the inputs overlap completely, length
    /// `max(L, K) − min(L, K) + 1`
    Valid,
}

impl ConvolutionMode {
    /// Offset into the full convolution and output length for inputs of
    /// length `a` and `b` (both non-zero)
    fn window(&self, a: usize, b: usize) -> (usize, usize) {
        let (short, long) = (a.min(b), a.max(b));
        match self {
            ConvolutionMode::Full => (0, a + b - 1),
            ConvolutionMode::Same => ((short - 1) / 2, long),
            ConvolutionMode::Valid => (short - 1, long - short + 1),
        }
    }
}

/// Discrete linear convolution of `signal` with `kernel`
///
/// # Errors
/// Returns `DesignError::InsufficientData` if either input is empty
pub fn convolve(signal: &[f64], kernel: &[f64], mode: ConvolutionMode) -> Result<Vec<f64>> {
    for input in [signal, kernel] {
        if input.is_empty() {
            return Err(DesignError::InsufficientData {
                needed: 1,
                available: 0,
            });
        }
    }

    let (start, len) = mode.window(signal.len(), kernel.len());
    let last_tap = kernel.len() - 1;

    let output = (start..start + len)
        .map(|k| {
            let lo = k.saturating_sub(last_tap);
            let hi = k.min(signal.len() - 1);
            (lo..=hi).map(|i| signal[i] * kernel[k - i]).sum()
        })
        .collect();

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_convolution() {
        let out = convolve(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5], ConvolutionMode::Full).unwrap();
        assert_eq!(out, vec![0.0, 1.0, 2.5, 4.0, 1.5]);
    }

    #[test]
    fn test_same_is_centered() {
        let out = convolve(&[1.0, 2.0, 3.0], &[0.0, 1.0, 0.5], ConvolutionMode::Same).unwrap();
        assert_eq!(out, vec![1.0, 2.5, 4.0]);

        // Even-length shorter input: offset (2 - 1) / 2 = 0
        let out = convolve(&[1.0, 2.0, 3.0, 4.0], &[1.0, 1.0], ConvolutionMode::Same).unwrap();
        assert_eq!(out, vec![1.0, 3.0, 5.0, 7.0]);
    }

    #[test]
    fn test_same_length_of_longer_input() {
        let signal: Vec<f64> = (0..100).map(|i| (i as f64 * 0.3).sin()).collect();
        let kernel = [0.1, 0.2, 0.4, 0.2, 0.1];
        let out = convolve(&signal, &kernel, ConvolutionMode::Same).unwrap();
        assert_eq!(out.len(), 100);

        let out = convolve(&kernel, &signal, ConvolutionMode::Same).unwrap();
        assert_eq!(out.len(), 100);
    }

    #[test]
    fn test_valid_convolution() {
        let out = convolve(&[1.0, 2.0, 3.0, 4.0], &[1.0, -1.0], ConvolutionMode::Valid).unwrap();
        assert_eq!(out, vec![1.0, 1.0, 1.0]);

        // Order of arguments does not matter
        let out = convolve(&[1.0, -1.0], &[1.0, 2.0, 3.0, 4.0], ConvolutionMode::Valid).unwrap();
        assert_eq!(out, vec![1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_symmetric_kernel_same_preserves_alignment() {
        // A delayed impulse through a symmetric kernel stays centered on the impulse
        let mut signal = vec![0.0; 11];
        signal[5] = 1.0;
        let out = convolve(&signal, &[0.25, 0.5, 0.25], ConvolutionMode::Same).unwrap();
        assert_eq!(out[4], 0.25);
        assert_eq!(out[5], 0.5);
        assert_eq!(out[6], 0.25);
    }

    #[test]
    fn test_empty_input_is_error() {
        assert!(matches!(
            convolve(&[], &[1.0], ConvolutionMode::Full),
            Err(DesignError::InsufficientData { .. })
        ));
        assert!(convolve(&[1.0], &[], ConvolutionMode::Same).is_err());
    }
}
