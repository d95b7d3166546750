//! Benchmarks for the stereo filter bank.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use stereo_verb::dsp::bank::FilterBank;
use stereo_verb::dsp::tuning::{damping_to_coef, room_to_feedback};

use crate::BLOCK_SIZES;

fn make_bank(room_size: f32, damping: f32) -> FilterBank {
    let mut bank = FilterBank::new().unwrap();
    bank.set_feedback(room_to_feedback(room_size));
    bank.set_damp(damping_to_coef(damping));
    bank
}

pub fn bench_reverb(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/reverb");

    for &size in BLOCK_SIZES {
        // Generate a test signal (impulse-like with some content)
        let input: Vec<f32> = (0..size)
            .map(|i| {
                if i < 10 {
                    1.0 - (i as f32 / 10.0) // Initial impulse
                } else {
                    (i as f32 * 0.05).sin() * 0.1 // Quiet tail
                }
            })
            .collect();

        for (name, room_size, damping) in [
            ("small_room", 0.3, 0.5),
            ("large_room", 0.9, 0.3),
            ("high_damping", 0.5, 0.9),
        ] {
            let mut bank = make_bank(room_size, damping);
            group.bench_with_input(BenchmarkId::new(name, size), &size, |b, _| {
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for &sample in &input {
                        let (l, r) = bank.process_sample(black_box(sample));
                        sum += l + r;
                    }
                    sum
                })
            });
        }
    }

    group.finish();
}
