//! Benchmarks for low-level DSP primitives.

mod delay;
mod reverb;

pub use delay::bench_delay;
pub use reverb::bench_reverb;
