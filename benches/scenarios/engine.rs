//! Benchmarks for full engine block processing.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{BenchmarkId, Criterion};
use stereo_verb::{ParamId, ReverbEngine, ReverbParams};

use crate::BLOCK_SIZES;

pub fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/engine");

    for &size in BLOCK_SIZES {
        let source_l: Vec<f32> = (0..size).map(|i| (i as f32 * 0.03).sin() * 0.5).collect();
        let source_r: Vec<f32> = (0..size).map(|i| (i as f32 * 0.021).cos() * 0.5).collect();
        let mut left = vec![0.0f32; size];
        let mut right = vec![0.0f32; size];

        // Defaults: medium room, full width
        let mut engine = ReverbEngine::default();
        engine.prepare(48_000.0, size).unwrap();
        group.bench_with_input(BenchmarkId::new("default", size), &size, |b, _| {
            b.iter(|| {
                left.copy_from_slice(&source_l);
                right.copy_from_slice(&source_r);
                engine
                    .process_block(black_box(&mut left), black_box(&mut right))
                    .unwrap();
            })
        });

        // Control thread moving a parameter every block
        let params = Arc::new(ReverbParams::new());
        let mut engine = ReverbEngine::new(Arc::clone(&params));
        engine.prepare(48_000.0, size).unwrap();
        let mut step = 0u32;
        group.bench_with_input(BenchmarkId::new("automated", size), &size, |b, _| {
            b.iter(|| {
                step = step.wrapping_add(1);
                params.set(ParamId::Width, (step % 100) as f32 / 100.0);
                left.copy_from_slice(&source_l);
                right.copy_from_slice(&source_r);
                engine
                    .process_block(black_box(&mut left), black_box(&mut right))
                    .unwrap();
            })
        });
    }

    group.finish();
}
