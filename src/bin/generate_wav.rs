use anyhow::{Context, Result};
use clap::Parser;
use linphase::save_wav;
use linphase::simulation::{
    AdditiveNoiseConfig, ImpulseNoiseConfig, NoiseConfig, Tone, generate_noisy_tones,
};
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "generate_wav")]
#[command(about = "Generate synthetic multi-tone WAV files for trying out FIR designs")]
struct Args {
    /// TOML signal configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output WAV file
    #[arg(short, long, default_value = "tones.wav")]
    output: PathBuf,

    /// Tones as comma-separated "freq_hz:amplitude" pairs (e.g., "1000:0.5,9000:0.5")
    #[arg(short, long)]
    tones: Option<String>,

    /// Seed for reproducible noise
    #[arg(short, long)]
    seed: Option<u64>,

    /// Signal duration in seconds
    #[arg(short, long, default_value_t = 1.0)]
    duration: f64,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 48000)]
    sample_rate: u32,

    /// AWGN SNR in dB (CLI override)
    #[arg(long)]
    snr: Option<f64>,

    /// Impulse noise rate in Hz (CLI override)
    #[arg(long)]
    impulse_rate: Option<f64>,
}

#[derive(Debug, Deserialize, Default)]
struct TomlConfig {
    seed: Option<u64>,
    #[serde(default, rename = "tone")]
    tones: Vec<ToneSection>,
    awgn: Option<AwgnSection>,
    impulse: Option<ImpulseSection>,
}

#[derive(Debug, Deserialize)]
struct ToneSection {
    frequency_hz: f64,
    amplitude: f64,
    #[serde(default)]
    phase: f64,
}

#[derive(Debug, Deserialize)]
struct AwgnSection {
    snr_db: f64,
}

#[derive(Debug, Deserialize)]
struct ImpulseSection {
    rate_hz: f64,
    amplitude: f64,
    duration_samples: usize,
}

/// Parse "freq_hz:amplitude" pairs separated by commas
fn parse_tones(s: &str) -> Result<Vec<(f64, f64)>> {
    s.split(',')
        .map(|pair| {
            let (freq, amp) = pair
                .trim()
                .split_once(':')
                .ok_or_else(|| anyhow::anyhow!("Invalid tone '{}'. Use 'freq_hz:amplitude'", pair))?;
            let freq: f64 = freq.trim().parse().context("Invalid tone frequency")?;
            let amp: f64 = amp.trim().parse().context("Invalid tone amplitude")?;
            Ok((freq, amp))
        })
        .collect()
}

fn load_toml_config(path: &PathBuf) -> Result<TomlConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn build_tones(toml: &TomlConfig, args: &Args) -> Result<Vec<Tone>> {
    let sample_rate = args.sample_rate as f64;
    let tones: Vec<Tone> = if let Some(ref spec) = args.tones {
        parse_tones(spec)?
            .into_iter()
            .map(|(hz, amp)| Tone::new(hz / sample_rate, amp))
            .collect()
    } else {
        toml.tones
            .iter()
            .map(|t| Tone {
                frequency: t.frequency_hz / sample_rate,
                amplitude: t.amplitude,
                phase: t.phase,
            })
            .collect()
    };

    if tones.is_empty() {
        anyhow::bail!("No tones configured; pass --tones or add [[tone]] sections");
    }
    if let Some(t) = tones.iter().find(|t| t.frequency < 0.0 || t.frequency > 0.5) {
        anyhow::bail!(
            "Tone at {:.1} Hz is above Nyquist for {} Hz sampling",
            t.frequency * sample_rate,
            args.sample_rate
        );
    }
    Ok(tones)
}

fn build_noise_config(toml: &TomlConfig, args: &Args) -> NoiseConfig {
    let mut config = NoiseConfig {
        seed: args.seed.or(toml.seed),
        ..Default::default()
    };

    if let Some(snr) = args.snr {
        config.additive = Some(AdditiveNoiseConfig { snr_db: snr });
    } else if let Some(ref awgn) = toml.awgn {
        config.additive = Some(AdditiveNoiseConfig {
            snr_db: awgn.snr_db,
        });
    }

    let sample_rate = args.sample_rate as f64;
    if let Some(impulse_rate) = args.impulse_rate {
        config.impulse = Some(ImpulseNoiseConfig {
            rate: impulse_rate / sample_rate,
            amplitude: 2.0,
            duration_samples: 5,
        });
    } else if let Some(ref impulse) = toml.impulse {
        config.impulse = Some(ImpulseNoiseConfig {
            rate: impulse.rate_hz / sample_rate,
            amplitude: impulse.amplitude,
            duration_samples: impulse.duration_samples,
        });
    }

    config
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let toml_config = if let Some(ref config_path) = args.config {
        load_toml_config(config_path)?
    } else {
        TomlConfig::default()
    };

    let tones = build_tones(&toml_config, &args)?;
    let noise_config = build_noise_config(&toml_config, &args);
    let num_samples = (args.duration * args.sample_rate as f64) as usize;

    let signal = generate_noisy_tones(num_samples, &tones, &noise_config);

    save_wav(&args.output, &[signal], args.sample_rate).context("Failed to write WAV file")?;

    eprintln!(
        "Generated {} samples ({} tones) in {}",
        num_samples,
        tones.len(),
        args.output.display()
    );
    Ok(())
}
