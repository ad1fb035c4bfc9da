use std::f64::consts::PI;

use super::noise::{NoiseConfig, apply_noise};

/// A sinusoidal component of a synthetic test signal
#[derive(Clone, Debug, serde::Deserialize)]
pub struct Tone {
    /// Frequency in cycles/sample (0.0 to 0.5)
    pub frequency: f64,
    pub amplitude: f64,
    /// Initial phase in radians
    #[serde(default)]
    pub phase: f64,
}

impl Tone {
    pub fn new(frequency: f64, amplitude: f64) -> Self {
        Self {
            frequency,
            amplitude,
            phase: 0.0,
        }
    }
}

/// Sum of sinusoids, `num_samples` long
pub fn generate_tones(num_samples: usize, tones: &[Tone]) -> Vec<f64> {
    (0..num_samples)
        .map(|n| {
            tones
                .iter()
                .map(|t| t.amplitude * (2.0 * PI * t.frequency * n as f64 + t.phase).sin())
                .sum()
        })
        .collect()
}

/// Sum of sinusoids with noise applied
pub fn generate_noisy_tones(
    num_samples: usize,
    tones: &[Tone],
    noise_config: &NoiseConfig,
) -> Vec<f64> {
    apply_noise(&generate_tones(num_samples, tones), noise_config)
}

/// Amplitude of the component at `frequency` (cycles/sample), estimated by
/// correlating with a quadrature pair
pub fn tone_amplitude(signal: &[f64], frequency: f64) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    let (i, q) = signal
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(i, q), (n, &x)| {
            let phase = 2.0 * PI * frequency * n as f64;
            (i + x * phase.cos(), q + x * phase.sin())
        });
    2.0 * (i * i + q * q).sqrt() / signal.len() as f64
}
