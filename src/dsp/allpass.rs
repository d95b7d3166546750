//! Freeverb allpass diffuser.
//!
//! ```text
//! out[n] = buf[n - N] - in[n]
//! buf[n] = in[n] + g * buf[n - N]
//! ```
//!
//! Spreads each echo into a cluster without coloring the spectrum much. The
//! coefficient `g` is fixed at construction and never exposed as a control.

use crate::dsp::delay::{DelayLine, SegmentView};
use crate::dsp::tuning::ALLPASS_FEEDBACK;

/// Allpass filter over a borrowed delay segment (RT-safe, no allocation)
#[derive(Debug, Clone)]
pub struct AllpassFilter {
    line: DelayLine,
    feedback: f32,
}

impl AllpassFilter {
    pub fn new(view: SegmentView) -> Self {
        Self {
            line: DelayLine::new(view),
            feedback: ALLPASS_FEEDBACK,
        }
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    pub fn delay_line(&self) -> &DelayLine {
        &self.line
    }

    #[inline]
    pub fn process(&mut self, arena: &mut [f32], input: f32) -> f32 {
        let buf_out = self.line.read(arena);
        let output = -input + buf_out;

        self.line.write(arena, input + buf_out * self.feedback);

        output
    }

    pub fn mute(&mut self, arena: &mut [f32]) {
        self.line.clear(arena);
    }
}
