//! Real-world scenario benchmarks.
//!
//! These run whole blocks through the engine the way an audio callback does,
//! including the per-block parameter read.

mod engine;

pub use engine::bench_engine;
