mod noise;
mod signal;

pub use noise::{AdditiveNoiseConfig, ImpulseNoiseConfig, NoiseConfig, apply_noise, signal_power};
pub use signal::{Tone, generate_noisy_tones, generate_tones, tone_amplitude};
