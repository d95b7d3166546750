pub mod dsp; // Delay lines, filters and the stereo filter bank
pub mod engine; // Parameter mapping, mixing and lifecycle
pub mod error;
pub mod host; // Channel layout and interleaving helpers for audio hosts

pub use engine::params::{ParamId, ParamSnapshot, ReverbParams};
pub use engine::{EngineConfig, ReverbEngine};
pub use error::{ConfigError, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;
