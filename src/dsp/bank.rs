//! Stereo Filter Bank - The Reverberator Core
//!
//! Two independent Schroeder/Freeverb networks, one per output channel, fed
//! from the same mono input.
//!
//! # Topology (per channel)
//!
//! ```text
//! Input ──┬──→ [Comb 1] ──┐
//!         ├──→ [Comb 2] ──┤
//!         ├──→   ...    ──┼──→ (+) ──→ [AP 1] ──→ [AP 2] ──→ [AP 3] ──→ [AP 4] ──→ Out
//!         └──→ [Comb 8] ──┘
//! ```
//!
//! The parallel combs build the dense echo pattern; the cascaded allpasses
//! smear it so the comb structure is no longer audible.
//!
//! # Stereo spread
//!
//! The right channel uses the same tuning table with every delay lengthened
//! by [`STEREO_SPREAD`](crate::dsp::tuning::STEREO_SPREAD) samples. The two
//! channels therefore never line up in phase, which is what makes the tail
//! sound wide.
//!
//! # Memory
//!
//! All comb lines live in one arena and all allpass lines in another, each
//! allocated exactly once when the bank is built. Processing never allocates.

use crate::dsp::allpass::AllpassFilter;
use crate::dsp::comb::CombFilter;
use crate::dsp::delay::{SampleArena, SegmentView};
use crate::dsp::tuning::{spread, ALLPASS_TUNINGS, COMB_TUNINGS, NUM_ALLPASSES, NUM_COMBS};
use crate::error::Result;

/// Number of output channels
pub const NUM_CHANNELS: usize = 2;

/// One channel's filter network
#[derive(Debug, Clone)]
pub struct ChannelFilters {
    combs: [CombFilter; NUM_COMBS],
    allpasses: [AllpassFilter; NUM_ALLPASSES],
}

impl ChannelFilters {
    pub fn combs(&self) -> &[CombFilter] {
        &self.combs
    }

    pub fn allpasses(&self) -> &[AllpassFilter] {
        &self.allpasses
    }

    #[inline]
    fn process(&mut self, comb_arena: &mut [f32], allpass_arena: &mut [f32], input: f32) -> f32 {
        let mut output = 0.0;
        for comb in &mut self.combs {
            output += comb.process(comb_arena, input);
        }

        for allpass in &mut self.allpasses {
            output = allpass.process(allpass_arena, output);
        }

        output
    }
}

/// Parallel combs into cascaded allpasses, for both channels
#[derive(Debug, Clone)]
pub struct FilterBank {
    comb_arena: SampleArena,
    allpass_arena: SampleArena,
    channels: [ChannelFilters; NUM_CHANNELS],
}

impl FilterBank {
    /// Build the bank from the standard tuning table
    pub fn new() -> Result<Self> {
        Self::with_tunings(&COMB_TUNINGS, &ALLPASS_TUNINGS)
    }

    /// Build the bank from explicit left-channel lengths.
    ///
    /// Right-channel lengths are derived by adding the stereo spread. Fails
    /// if any length is zero.
    pub fn with_tunings(
        comb_tunings: &[usize; NUM_COMBS],
        allpass_tunings: &[usize; NUM_ALLPASSES],
    ) -> Result<Self> {
        let (comb_arena, comb_views) = SampleArena::carve(&stereo_lengths(comb_tunings))?;
        let (allpass_arena, allpass_views) =
            SampleArena::carve(&stereo_lengths(allpass_tunings))?;

        // Segments are laid out left/right interleaved per tuning slot
        let channels = std::array::from_fn(|channel| ChannelFilters {
            combs: std::array::from_fn(|i| {
                CombFilter::new(comb_views[i * NUM_CHANNELS + channel])
            }),
            allpasses: std::array::from_fn(|i| {
                AllpassFilter::new(allpass_views[i * NUM_CHANNELS + channel])
            }),
        });

        Ok(Self {
            comb_arena,
            allpass_arena,
            channels,
        })
    }

    /// Set loop gain on every comb in both channels
    pub fn set_feedback(&mut self, feedback: f32) {
        for channel in &mut self.channels {
            for comb in &mut channel.combs {
                comb.set_feedback(feedback);
            }
        }
    }

    /// Set the loop lowpass coefficient on every comb in both channels
    pub fn set_damp(&mut self, damp: f32) {
        for channel in &mut self.channels {
            for comb in &mut channel.combs {
                comb.set_damp(damp);
            }
        }
    }

    /// Run one mono sample through both networks, returning `(left, right)`
    #[inline]
    pub fn process_sample(&mut self, input: f32) -> (f32, f32) {
        let Self {
            comb_arena,
            allpass_arena,
            channels,
        } = self;
        let comb_arena = comb_arena.as_mut_slice();
        let allpass_arena = allpass_arena.as_mut_slice();

        let [left, right] = channels;
        let out_l = left.process(comb_arena, allpass_arena, input);
        let out_r = right.process(comb_arena, allpass_arena, input);

        (out_l, out_r)
    }

    /// Zero every delay line and loop filter
    pub fn mute(&mut self) {
        for channel in &mut self.channels {
            for comb in &mut channel.combs {
                comb.mute(self.comb_arena.as_mut_slice());
            }
            for allpass in &mut channel.allpasses {
                allpass.mute(self.allpass_arena.as_mut_slice());
            }
        }
    }

    pub fn channel(&self, index: usize) -> &ChannelFilters {
        &self.channels[index]
    }

    /// Size of the shared comb buffer in samples
    pub fn comb_arena_len(&self) -> usize {
        self.comb_arena.len()
    }

    /// Size of the shared allpass buffer in samples
    pub fn allpass_arena_len(&self) -> usize {
        self.allpass_arena.len()
    }

    /// Every comb segment, left channel first
    pub fn comb_segments(&self) -> impl Iterator<Item = SegmentView> + '_ {
        self.channels
            .iter()
            .flat_map(|channel| channel.combs.iter().map(|comb| comb.delay_line().view()))
    }

    /// Every allpass segment, left channel first
    pub fn allpass_segments(&self) -> impl Iterator<Item = SegmentView> + '_ {
        self.channels.iter().flat_map(|channel| {
            channel
                .allpasses
                .iter()
                .map(|allpass| allpass.delay_line().view())
        })
    }
}

/// Interleave base and spread lengths: `[L0, R0, L1, R1, ...]`
fn stereo_lengths(tunings: &[usize]) -> Vec<usize> {
    tunings
        .iter()
        .flat_map(|&base| (0..NUM_CHANNELS).map(move |channel| spread(base, channel)))
        .collect()
}
