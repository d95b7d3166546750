//! WAV file loading and saving

use std::path::Path;

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use stereo_verb::host::{deinterleave, interleave, ChannelLayout};

/// A decoded file split into left/right
pub struct StereoClip {
    pub sample_rate: u32,
    pub left: Vec<f32>,
    pub right: Vec<f32>,
}

impl StereoClip {
    pub fn frames(&self) -> usize {
        self.left.len()
    }
}

/// Read a mono or stereo WAV file. Mono is copied to both channels.
pub fn read_stereo(path: &Path) -> EyreResult<StereoClip> {
    let mut reader = hound::WavReader::open(path)
        .wrap_err_with(|| format!("failed to open {}", path.display()))?;
    let spec = reader.spec();
    let channels = spec.channels as usize;

    // Mono is upmixed before it reaches the engine
    if channels != 1 {
        ChannelLayout::new(channels, 2).check()?;
    }

    let samples: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Int => {
            let max_val = (1_i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<Result<Vec<f32>, _>>()
        }
        hound::SampleFormat::Float => reader.samples::<f32>().collect::<Result<Vec<f32>, _>>(),
    }
    .wrap_err_with(|| format!("failed to decode {}", path.display()))?;

    let frames = samples.len() / channels;
    let mut left = vec![0.0; frames];
    let mut right = vec![0.0; frames];
    deinterleave(&samples, channels, &mut left, &mut right);

    log::debug!(
        "read {}: {} ch, {} Hz, {} frames",
        path.display(),
        channels,
        spec.sample_rate,
        frames
    );

    Ok(StereoClip {
        sample_rate: spec.sample_rate,
        left,
        right,
    })
}

/// Write a 32-bit float stereo WAV file
pub fn write_stereo(path: &Path, clip: &StereoClip) -> EyreResult<()> {
    let spec = hound::WavSpec {
        channels: 2,
        sample_rate: clip.sample_rate,
        bits_per_sample: 32,
        sample_format: hound::SampleFormat::Float,
    };

    let mut frames = vec![0.0f32; clip.frames() * 2];
    interleave(&clip.left, &clip.right, 2, &mut frames);

    let mut writer = hound::WavWriter::create(path, spec)
        .wrap_err_with(|| format!("failed to create {}", path.display()))?;
    for sample in frames {
        writer.write_sample(sample)?;
    }
    writer
        .finalize()
        .wrap_err_with(|| format!("failed to finalize {}", path.display()))?;

    Ok(())
}
