//! Benchmarks for delay-backed filters.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stereo_verb::dsp::{AllpassFilter, CombFilter, SampleArena};

use crate::BLOCK_SIZES;

pub fn bench_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/delay");

    // Shortest and longest lines in the tuning table
    let delay_lengths: &[usize] = &[225, 1640];

    for &size in BLOCK_SIZES {
        let input: Vec<f32> = (0..size).map(|i| (i as f32 * 0.1).sin()).collect();

        for &length in delay_lengths {
            let (mut arena, views) = SampleArena::carve(&[length]).unwrap();

            let mut comb = CombFilter::new(views[0]);
            comb.set_feedback(0.84);
            comb.set_damp(0.2);
            group.bench_with_input(
                BenchmarkId::new(format!("comb_{}", length), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for &sample in &input {
                            sum += comb.process(arena.as_mut_slice(), black_box(sample));
                        }
                        sum
                    })
                },
            );

            let mut allpass = AllpassFilter::new(views[0]);
            group.bench_with_input(
                BenchmarkId::new(format!("allpass_{}", length), size),
                &size,
                |b, _| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for &sample in &input {
                            sum += allpass.process(arena.as_mut_slice(), black_box(sample));
                        }
                        sum
                    })
                },
            );
        }
    }

    group.finish();
}
