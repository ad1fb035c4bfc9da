use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use hound::{WavReader, WavSpec, WavWriter};

/// De-interleaved audio read from a WAV file
#[derive(Debug, Clone)]
pub struct WavData {
    pub sample_rate: u32,
    /// One vector per channel, samples scaled to [-1, 1]
    pub channels: Vec<Vec<f64>>,
}

/// Read every channel of a WAV file
pub fn read_wav<P: AsRef<Path>>(path: P) -> Result<WavData, hound::Error> {
    let reader = WavReader::open(path.as_ref())?;
    let spec = reader.spec();
    let interleaved = read_samples(reader, &spec)?;

    let num_channels = spec.channels.max(1) as usize;
    let mut channels = vec![Vec::with_capacity(interleaved.len() / num_channels); num_channels];
    for frame in interleaved.chunks_exact(num_channels) {
        for (channel, &sample) in channels.iter_mut().zip(frame) {
            channel.push(sample);
        }
    }

    Ok(WavData {
        sample_rate: spec.sample_rate,
        channels,
    })
}

fn read_samples(
    mut reader: WavReader<BufReader<File>>,
    spec: &WavSpec,
) -> Result<Vec<f64>, hound::Error> {
    match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect(),
        hound::SampleFormat::Int => {
            let max_val = 2_i64.pow(spec.bits_per_sample as u32 - 1) as f64;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f64 / max_val))
                .collect()
        }
    }
}

/// Write equal-length channels as a 32-bit float WAV file
pub fn save_wav<P: AsRef<Path>>(
    path: P,
    channels: &[Vec<f64>],
    sample_rate: u32,
) -> Result<(), hound::Error> {
    let spec = WavSpec {
        channels: channels.len() as u16,
        sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut writer = WavWriter::create(path.as_ref(), spec)?;

    let frames = channels.iter().map(Vec::len).min().unwrap_or(0);
    for i in 0..frames {
        for channel in channels {
            writer.write_sample(channel[i] as f32)?;
        }
    }

    writer.finalize()?;
    Ok(())
}
