//! Low-level DSP primitives used by the reverb engine.
//!
//! These components are allocation-free once constructed and realtime-safe.
//! Filters never own their sample memory: each one holds a view into a
//! backing buffer owned by the [`bank::FilterBank`], and the bank hands the
//! buffer in on every `process` call.

/// Freeverb-style allpass diffuser.
pub mod allpass;
/// Stereo bank of parallel combs feeding cascaded allpasses.
pub mod bank;
/// Feedback comb with a one-pole lowpass in the loop.
pub mod comb;
/// Backing buffers, segment views and circular delay cursors.
pub mod delay;
/// Fixed delay lengths and coefficient scaling constants.
pub mod tuning;

pub use allpass::AllpassFilter;
pub use bank::FilterBank;
pub use comb::CombFilter;
pub use delay::{DelayLine, SampleArena, SegmentView};
