//! Error types for engine configuration.
//!
//! Nothing in here is produced from inside the per-sample loop. Every variant
//! is raised either while carving delay-line buffers or while checking the
//! shape of a block before any sample is touched.

use thiserror::Error;

/// Configuration error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Sample rate must be finite and positive
    #[error("Invalid sample rate: {0}")]
    InvalidSampleRate(f64),

    /// Maximum block size must be non-zero
    #[error("Invalid block size: {0}")]
    InvalidBlockSize(usize),

    /// A delay-line segment was requested with zero length
    #[error("Delay segment {index} has zero length")]
    EmptySegment { index: usize },

    /// Two delay-line segments share samples
    #[error("Delay segment {index} at [{offset}, {end}) overlaps a previous segment")]
    SegmentOverlap {
        index: usize,
        offset: usize,
        end: usize,
    },

    /// A delay-line segment reaches past its backing buffer
    #[error("Delay segment {index} ends at {end}, past buffer capacity {capacity}")]
    SegmentOutOfBounds {
        index: usize,
        end: usize,
        capacity: usize,
    },

    /// Left and right channel buffers differ in length
    #[error("Channel length mismatch: left {left}, right {right}")]
    ChannelMismatch { left: usize, right: usize },

    /// Block is longer than the size the engine was prepared for
    #[error("Block of {len} samples exceeds prepared maximum {max}")]
    BlockTooLarge { len: usize, max: usize },

    /// Engine has no buffers yet
    #[error("Engine used before prepare")]
    NotPrepared,

    /// Only stereo in / stereo out is supported
    #[error("Unsupported channel layout: {inputs} in, {outputs} out")]
    UnsupportedLayout { inputs: usize, outputs: usize },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
