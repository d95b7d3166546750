use std::sync::Arc;

use stereo_verb::dsp::bank::FilterBank;
use stereo_verb::dsp::tuning::{ALLPASS_TUNINGS, COMB_TUNINGS, OFFSET_ROOM, SCALE_ROOM, STEREO_SPREAD};
use stereo_verb::{ParamId, ParamSnapshot, ReverbEngine, ReverbParams};

const SAMPLE_RATE: f64 = 44_100.0;
const BLOCK: usize = 256;

fn engine_with(snapshot: ParamSnapshot) -> ReverbEngine {
    let params = Arc::new(ReverbParams::new());
    params.restore(&snapshot);
    let mut engine = ReverbEngine::new(params);
    engine.prepare(SAMPLE_RATE, BLOCK).unwrap();
    engine
}

/// Feed a unit impulse on both channels followed by silence
fn impulse_response(engine: &mut ReverbEngine, blocks: usize) -> (Vec<f32>, Vec<f32>) {
    let mut out_l = Vec::with_capacity(blocks * BLOCK);
    let mut out_r = Vec::with_capacity(blocks * BLOCK);
    for block in 0..blocks {
        let mut l = vec![0.0; BLOCK];
        let mut r = vec![0.0; BLOCK];
        if block == 0 {
            l[0] = 1.0;
            r[0] = 1.0;
        }
        engine.process_block(&mut l, &mut r).unwrap();
        out_l.extend_from_slice(&l);
        out_r.extend_from_slice(&r);
    }
    (out_l, out_r)
}

fn peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
}

fn wet_only() -> ParamSnapshot {
    ParamSnapshot {
        wet: 1.0,
        dry: 0.0,
        ..ParamSnapshot::default()
    }
}

#[test]
fn feedback_stays_below_unity_for_all_room_sizes() {
    let params = Arc::new(ReverbParams::new());
    let mut engine = ReverbEngine::new(Arc::clone(&params));

    for step in 0..=50 {
        params.set(ParamId::RoomSize, step as f32 / 50.0);
        engine.update_params();
        let fb = engine.feedback();
        assert!(fb >= OFFSET_ROOM - 1e-6, "feedback {fb} below offset");
        assert!(fb <= OFFSET_ROOM + SCALE_ROOM + 1e-6, "feedback {fb} above range");
        assert!(fb < 1.0);
    }
}

#[test]
fn impulse_response_decays_at_max_room_size() {
    let mut engine = engine_with(ParamSnapshot {
        room_size: 1.0,
        damping: 0.0,
        ..wet_only()
    });

    // ~12 seconds of tail
    let blocks = 2_000;
    let (l, r) = impulse_response(&mut engine, blocks);
    assert!(l.iter().chain(r.iter()).all(|s| s.is_finite()));

    let second = (SAMPLE_RATE as usize / BLOCK) * BLOCK;
    let early = peak(&l[..second]).max(peak(&r[..second]));
    let late = peak(&l[l.len() - second..]).max(peak(&r[r.len() - second..]));

    assert!(early > 0.0);
    assert!(late < early * 0.5, "tail did not decay: early {early}, late {late}");
}

#[test]
fn silence_in_silence_out() {
    for room_size in [0.0, 0.5, 1.0] {
        for damping in [0.0, 1.0] {
            let mut engine = engine_with(ParamSnapshot {
                room_size,
                damping,
                wet: 1.0,
                dry: 1.0,
                width: 0.5,
            });
            for _ in 0..40 {
                let mut l = vec![0.0; BLOCK];
                let mut r = vec![0.0; BLOCK];
                engine.process_block(&mut l, &mut r).unwrap();
                assert!(l.iter().chain(r.iter()).all(|&s| s == 0.0));
            }
        }
    }
}

#[test]
fn dry_only_passes_input_through_exactly() {
    for width in [0.0, 0.5, 1.0] {
        let mut engine = engine_with(ParamSnapshot {
            wet: 0.0,
            dry: 1.0,
            width,
            ..ParamSnapshot::default()
        });

        for block in 0..30 {
            let input_l: Vec<f32> = (0..BLOCK)
                .map(|i| (((block * BLOCK + i) as f32) * 0.013).sin() * 0.8)
                .collect();
            let input_r: Vec<f32> = input_l.iter().map(|s| -0.5 * s).collect();
            let mut l = input_l.clone();
            let mut r = input_r.clone();

            engine.process_block(&mut l, &mut r).unwrap();

            assert_eq!(l, input_l);
            assert_eq!(r, input_r);
        }
    }
}

#[test]
fn full_width_keeps_channels_independent() {
    let mut engine = engine_with(ParamSnapshot {
        width: 1.0,
        ..wet_only()
    });
    let mix = engine.mix();
    assert_eq!(mix.wet1, 1.0);
    assert_eq!(mix.wet2, 0.0);

    // With no cross-feed, output is exactly the bank's own channel output
    let mut reference = FilterBank::new().unwrap();
    reference.set_feedback(engine.feedback());
    reference.set_damp(engine.damp());

    let (l, r) = impulse_response(&mut engine, 20);
    for (i, (&ol, &or)) in l.iter().zip(r.iter()).enumerate() {
        let input = if i == 0 { 2.0 * 0.015 } else { 0.0 };
        let (bl, br) = reference.process_sample(input);
        assert_eq!(ol, bl);
        assert_eq!(or, br);
    }
}

#[test]
fn zero_width_collapses_wet_image() {
    let mut engine = engine_with(ParamSnapshot {
        wet: 0.33,
        dry: 0.0,
        width: 0.0,
        ..ParamSnapshot::default()
    });
    let mix = engine.mix();
    assert_eq!(mix.wet1, mix.wet2);
    assert!((mix.wet1 - 0.165).abs() < 1e-7);

    let (l, r) = impulse_response(&mut engine, 20);
    assert_eq!(l, r);
}

#[test]
fn identical_engines_are_bit_identical() {
    let run = || {
        let params = Arc::new(ReverbParams::new());
        let mut engine = ReverbEngine::new(Arc::clone(&params));
        engine.prepare(SAMPLE_RATE, BLOCK).unwrap();

        let mut out = Vec::new();
        for block in 0..40 {
            params.set(ParamId::RoomSize, (block as f32 * 0.07) % 1.0);
            params.set(ParamId::Width, (block as f32 * 0.11) % 1.0);
            let mut l: Vec<f32> = (0..BLOCK).map(|i| ((block * BLOCK + i) as f32 * 0.05).sin()).collect();
            let mut r: Vec<f32> = (0..BLOCK).map(|i| ((block * BLOCK + i) as f32 * 0.031).cos()).collect();
            engine.process_block(&mut l, &mut r).unwrap();
            out.extend(l.iter().chain(r.iter()).map(|s| s.to_bits()));
        }
        out
    };

    assert_eq!(run(), run());
}

#[test]
fn carved_segments_fill_buffers_exactly() {
    let bank = FilterBank::new().unwrap();

    let comb_segments: Vec<_> = bank.comb_segments().collect();
    let comb_sum: usize = comb_segments.iter().map(|s| s.len()).sum();
    assert_eq!(comb_sum, bank.comb_arena_len());
    let expected: usize = COMB_TUNINGS.iter().map(|&t| t + t + STEREO_SPREAD).sum();
    assert_eq!(comb_sum, expected);

    let allpass_sum: usize = bank.allpass_segments().map(|s| s.len()).sum();
    assert_eq!(allpass_sum, bank.allpass_arena_len());
    let expected: usize = ALLPASS_TUNINGS.iter().map(|&t| t + t + STEREO_SPREAD).sum();
    assert_eq!(allpass_sum, expected);

    let mut sorted = comb_segments.clone();
    sorted.sort_by_key(|s| s.offset());
    assert_eq!(sorted[0].offset(), 0);
    for pair in sorted.windows(2) {
        assert_eq!(pair[0].end(), pair[1].offset(), "gap or overlap between segments");
    }
    assert_eq!(sorted.last().unwrap().end(), bank.comb_arena_len());
}

#[test]
fn reprepare_discards_previous_tail() {
    let mut engine = engine_with(wet_only());
    let first = impulse_response(&mut engine, 30);

    // Leave energy ringing in the network, then reconfigure
    let mut l = vec![0.9; BLOCK];
    let mut r = vec![-0.4; BLOCK];
    engine.process_block(&mut l, &mut r).unwrap();
    engine.prepare(SAMPLE_RATE, BLOCK).unwrap();

    let second = impulse_response(&mut engine, 30);
    assert_eq!(first, second);
}

#[test]
fn restored_params_match_fresh_start() {
    let target = ParamSnapshot {
        room_size: 0.8,
        damping: 0.25,
        wet: 0.6,
        dry: 0.3,
        width: 0.4,
    };

    let mut fresh = engine_with(target);

    // Start somewhere else, then restore before the first block
    let params = Arc::new(ReverbParams::new());
    params.set(ParamId::RoomSize, 0.1);
    params.set(ParamId::Width, 1.0);
    let mut restored = ReverbEngine::new(Arc::clone(&params));
    restored.prepare(SAMPLE_RATE, BLOCK).unwrap();
    params.restore(&target);

    assert_eq!(
        impulse_response(&mut fresh, 20),
        impulse_response(&mut restored, 20)
    );
}

#[test]
fn mute_matches_fresh_engine() {
    let mut engine = engine_with(wet_only());
    let reference = impulse_response(&mut engine_with(wet_only()), 20);

    let mut l = vec![0.7; BLOCK];
    let mut r = vec![0.7; BLOCK];
    for _ in 0..10 {
        engine.process_block(&mut l, &mut r).unwrap();
    }
    engine.mute();

    assert_eq!(impulse_response(&mut engine, 20), reference);
}
