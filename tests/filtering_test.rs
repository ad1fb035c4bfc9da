use linphase::config::{FilterSpec, NormOrder};
use linphase::filter_design::{BandSpec, FilterDesigner, sample_bands};
use linphase::signal_processing::ConvolutionMode;
use linphase::simulation::{NoiseConfig, Tone, apply_noise, generate_tones, signal_power, tone_amplitude};

const PASS_TONE: f64 = 0.03;
const STOP_TONE: f64 = 0.35;

fn lowpass(norm: NormOrder) -> FilterDesigner {
    let (grid, desired) = sample_bands(
        256,
        &[BandSpec::new(0.0, 0.1, 0.0), BandSpec::new(0.2, 0.5, -40.0)],
    )
    .unwrap();
    let mut designer = FilterDesigner::new(FilterSpec {
        order: 20,
        norm,
        ..Default::default()
    });
    designer.design(&grid, &desired).unwrap();
    designer
}

#[test]
fn test_lowpass_separates_tones() {
    let signal = generate_tones(2400, &[Tone::new(PASS_TONE, 1.0), Tone::new(STOP_TONE, 1.0)]);

    for norm in [NormOrder::L1, NormOrder::L2, NormOrder::Inf] {
        let designer = lowpass(norm);
        let filtered = designer.apply(&signal, ConvolutionMode::Same).unwrap();
        assert_eq!(filtered.len(), signal.len());

        // Skip the edge transient; 2000 samples hold whole cycles of both tones
        let segment = &filtered[100..2100];
        let pass = tone_amplitude(segment, PASS_TONE);
        let stop = tone_amplitude(segment, STOP_TONE);

        assert!((pass - 1.0).abs() < 0.05, "L{} passband gain {}", norm, pass);
        assert!(stop < 0.05, "L{} stopband leakage {}", norm, stop);
    }
}

#[test]
fn test_same_mode_is_time_aligned() {
    // Linear phase with the delay removed: a passband tone comes out in phase
    let signal = generate_tones(1000, &[Tone::new(0.01, 1.0)]);
    let designer = lowpass(NormOrder::L2);
    let filtered = designer.apply(&signal, ConvolutionMode::Same).unwrap();

    for n in 100..900 {
        assert!(
            (filtered[n] - signal[n]).abs() < 0.02,
            "sample {}: {} vs {}",
            n,
            filtered[n],
            signal[n]
        );
    }
}

#[test]
fn test_valid_mode_drops_edges() {
    let signal = generate_tones(500, &[Tone::new(PASS_TONE, 1.0)]);
    let designer = lowpass(NormOrder::L1);
    let kernel_len = designer.kernel().unwrap().num_taps();

    let full = designer.apply(&signal, ConvolutionMode::Full).unwrap();
    let valid = designer.apply(&signal, ConvolutionMode::Valid).unwrap();

    assert_eq!(full.len(), signal.len() + kernel_len - 1);
    assert_eq!(valid.len(), signal.len() - kernel_len + 1);
    assert_eq!(&full[kernel_len - 1..signal.len()], valid.as_slice());
}

#[test]
fn test_lowpass_reduces_white_noise_power() {
    let tone = generate_tones(4000, &[Tone::new(PASS_TONE, 1.0)]);
    let noisy = apply_noise(&tone, &NoiseConfig::default().with_seed(42).with_awgn(0.0));
    let noise: Vec<f64> = noisy.iter().zip(&tone).map(|(n, s)| n - s).collect();
    assert!(signal_power(&noise) > 0.1);

    let designer = lowpass(NormOrder::L2);
    let filtered = designer.apply(&noise, ConvolutionMode::Valid).unwrap();

    // Roughly the passband share of the spectrum survives
    let ratio = signal_power(&filtered) / signal_power(&noise);
    assert!(ratio < 0.45, "noise power ratio {}", ratio);
}
