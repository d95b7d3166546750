//! Reverb tuning table.
//!
//! Delay lengths are in samples and tuned for a nominal 44.1 kHz. They are
//! not rescaled for other rates; a higher rate simply yields a smaller room.

/// Number of parallel comb filters per channel
pub const NUM_COMBS: usize = 8;
/// Number of cascaded allpass filters per channel
pub const NUM_ALLPASSES: usize = 4;

/// Left-channel comb lengths, mutually unrelated to avoid stacked resonances
pub const COMB_TUNINGS: [usize; NUM_COMBS] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
/// Left-channel allpass lengths
pub const ALLPASS_TUNINGS: [usize; NUM_ALLPASSES] = [556, 441, 341, 225];

/// Extra samples added to every right-channel delay line
pub const STEREO_SPREAD: usize = 23;

/// Input attenuation applied to the mono downmix before the comb bank
pub const FIXED_GAIN: f32 = 0.015;
/// Damping control to comb lowpass coefficient
pub const SCALE_DAMP: f32 = 0.4;
/// Room size control to comb feedback slope
pub const SCALE_ROOM: f32 = 0.28;
/// Comb feedback at room size 0
pub const OFFSET_ROOM: f32 = 0.7;
/// Allpass feedback, fixed for the lifetime of the engine
pub const ALLPASS_FEEDBACK: f32 = 0.5;

/// Magnitudes below this are flushed to zero when written into a delay line
pub const DENORMAL_THRESHOLD: f32 = 1.0e-20;

/// Delay length for a tuning slot on a given channel (0 = left, 1 = right)
#[inline]
pub const fn spread(base: usize, channel: usize) -> usize {
    base + channel * STEREO_SPREAD
}

/// Map a normalized room size onto comb feedback.
///
/// Stays within `[OFFSET_ROOM, OFFSET_ROOM + SCALE_ROOM]` for inputs in
/// `[0, 1]`, which keeps every comb strictly below unity gain.
#[inline]
pub fn room_to_feedback(room_size: f32) -> f32 {
    room_size * SCALE_ROOM + OFFSET_ROOM
}

/// Map normalized damping onto the comb's lowpass coefficient
#[inline]
pub fn damping_to_coef(damping: f32) -> f32 {
    damping * SCALE_DAMP
}
