// Purpose - the boundary to audio hosts: channel layout, tail length,
// interleaved frame conversion

use crate::error::{ConfigError, Result};

/// Seconds of output a host should keep pulling after input stops
pub const TAIL_LENGTH_SECONDS: f64 = 2.0;

/// Input/output channel counts offered by a host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    pub inputs: usize,
    pub outputs: usize,
}

impl ChannelLayout {
    pub const STEREO: ChannelLayout = ChannelLayout {
        inputs: 2,
        outputs: 2,
    };

    pub fn new(inputs: usize, outputs: usize) -> Self {
        Self { inputs, outputs }
    }

    /// Only stereo in, stereo out
    pub fn is_supported(&self) -> bool {
        *self == Self::STEREO
    }

    pub fn check(&self) -> Result<()> {
        if self.is_supported() {
            Ok(())
        } else {
            Err(ConfigError::UnsupportedLayout {
                inputs: self.inputs,
                outputs: self.outputs,
            })
        }
    }
}

/// Split interleaved frames into left/right.
///
/// Mono input is copied to both sides; channels past the second are
/// ignored. Returns the number of frames written, bounded by the shortest of
/// the three buffers.
pub fn deinterleave(frames: &[f32], channels: usize, left: &mut [f32], right: &mut [f32]) -> usize {
    if channels == 0 {
        return 0;
    }

    let count = (frames.len() / channels).min(left.len()).min(right.len());
    for (i, frame) in frames.chunks_exact(channels).take(count).enumerate() {
        left[i] = frame[0];
        right[i] = if channels > 1 { frame[1] } else { frame[0] };
    }
    count
}

/// Write left/right into interleaved frames.
///
/// Mono output gets the average of both sides; extra channels are zeroed.
pub fn interleave(left: &[f32], right: &[f32], channels: usize, frames: &mut [f32]) -> usize {
    if channels == 0 {
        return 0;
    }

    let count = (frames.len() / channels).min(left.len()).min(right.len());
    for (i, frame) in frames.chunks_exact_mut(channels).take(count).enumerate() {
        if channels == 1 {
            frame[0] = 0.5 * (left[i] + right[i]);
            continue;
        }
        frame[0] = left[i];
        frame[1] = right[i];
        frame[2..].fill(0.0);
    }
    count
}
