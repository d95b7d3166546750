//! Feedback comb filter with a damped loop.
//!
//! ```text
//! out[n]   = buf[n - N]
//! store[n] = out[n] * (1 - d) + store[n - 1] * d
//! buf[n]   = in[n] + store[n] * feedback
//! ```
//!
//! The one-pole lowpass in the loop makes high frequencies die away faster
//! than lows, which is what gives the tail its tone.

use crate::dsp::delay::{DelayLine, SegmentView};

/// Comb filter over a borrowed delay segment (RT-safe, no allocation)
#[derive(Debug, Clone)]
pub struct CombFilter {
    line: DelayLine,
    feedback: f32,
    filter_store: f32,
    damp1: f32,
    damp2: f32,
}

impl CombFilter {
    pub fn new(view: SegmentView) -> Self {
        Self {
            line: DelayLine::new(view),
            feedback: 0.0,
            filter_store: 0.0,
            damp1: 0.0,
            damp2: 1.0,
        }
    }

    /// Loop gain. Must stay below 1.0; not clamped here.
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback;
    }

    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Lowpass coefficient. `damp1 + damp2` is always 1.
    pub fn set_damp(&mut self, damp: f32) {
        self.damp1 = damp;
        self.damp2 = 1.0 - damp;
    }

    pub fn damp(&self) -> f32 {
        self.damp1
    }

    pub fn filter_store(&self) -> f32 {
        self.filter_store
    }

    pub fn delay_line(&self) -> &DelayLine {
        &self.line
    }

    #[inline]
    pub fn process(&mut self, arena: &mut [f32], input: f32) -> f32 {
        let output = self.line.read(arena);

        self.filter_store = output * self.damp2 + self.filter_store * self.damp1;

        self.line.write(arena, input + self.filter_store * self.feedback);

        output
    }

    /// Silence the delay segment and the loop filter
    pub fn mute(&mut self, arena: &mut [f32]) {
        self.line.clear(arena);
        self.filter_store = 0.0;
    }
}
