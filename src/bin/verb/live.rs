//! Live playback through the default output device.
//!
//! The audio callback owns the engine. The main thread is the control
//! surface: it reads commands from stdin, stores parameter values in the
//! shared atomics and sends mute requests over a ring buffer.

use std::io::{self, BufRead};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use stereo_verb::engine::message::EngineMessage;
use stereo_verb::host::interleave;
use stereo_verb::{ParamId, ReverbEngine, ReverbParams, MAX_BLOCK_SIZE};

use super::wav::read_stereo;
use super::ParamArgs;

#[derive(Args, Debug)]
pub struct LiveArgs {
    /// WAV file to loop; a click train is used when omitted
    #[arg(long)]
    input: Option<PathBuf>,
    /// Seconds between clicks in the built-in source
    #[arg(long, default_value_t = 1.5)]
    click_interval: f32,
    #[command(flatten)]
    params: ParamArgs,
}

/// Stereo clip played in a loop
struct LoopSource {
    left: Vec<f32>,
    right: Vec<f32>,
    pos: usize,
}

impl LoopSource {
    fn new(left: Vec<f32>, right: Vec<f32>) -> Self {
        Self { left, right, pos: 0 }
    }

    /// Short decaying noise bursts, one every `interval` seconds
    fn clicks(sample_rate: f32, interval: f32) -> Self {
        let period = ((interval.max(0.05) * sample_rate) as usize).max(1);
        let burst = ((0.005 * sample_rate) as usize).clamp(1, period);

        let mut seed = 0x1234_5678u32;
        let mut left = vec![0.0f32; period];
        for (i, sample) in left.iter_mut().take(burst).enumerate() {
            // xorshift noise
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let noise = (seed as f32 / u32::MAX as f32) * 2.0 - 1.0;
            *sample = noise * 0.8 * (1.0 - i as f32 / burst as f32);
        }
        let right = left.clone();

        Self::new(left, right)
    }

    fn fill(&mut self, left: &mut [f32], right: &mut [f32]) {
        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            *l = self.left[self.pos];
            *r = self.right[self.pos];
            self.pos += 1;
            if self.pos >= self.left.len() {
                self.pos = 0;
            }
        }
    }
}

/// A line typed on the control surface
#[derive(Debug, PartialEq)]
enum ControlCommand {
    Set(ParamId, f32),
    Mute,
    Show,
    Quit,
}

fn parse_command(line: &str) -> Result<ControlCommand, String> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(ControlCommand::Show);
    };

    match head.to_ascii_lowercase().as_str() {
        "mute" => Ok(ControlCommand::Mute),
        "show" => Ok(ControlCommand::Show),
        "quit" | "exit" => Ok(ControlCommand::Quit),
        _ => {
            let param = ParamId::from_id(head).ok_or_else(|| format!("unknown command: {head}"))?;
            let value = words
                .next()
                .ok_or_else(|| format!("missing value for {param}"))?
                .parse::<f32>()
                .map_err(|e| format!("bad value for {param}: {e}"))?;
            Ok(ControlCommand::Set(param, value))
        }
    }
}

fn print_params(params: &ReverbParams) {
    for param in ParamId::ALL {
        println!("  {:<16} {:.3}", param.name(), params.get(param));
    }
}

pub fn run(args: LiveArgs) -> EyreResult<()> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| eyre!("no default output device available"))?;
    let config = device
        .default_output_config()
        .wrap_err("failed to fetch default output config")?;

    let sample_rate = config.sample_rate().0 as f32;
    let channels = config.channels() as usize;

    let mut source = match &args.input {
        Some(path) => {
            let clip = read_stereo(path)?;
            if clip.sample_rate as f32 != sample_rate {
                log::warn!(
                    "{} is {} Hz but the device runs at {} Hz; playing without resampling",
                    path.display(),
                    clip.sample_rate,
                    sample_rate
                );
            }
            if clip.frames() == 0 {
                return Err(eyre!("{} has no audio", path.display()));
            }
            LoopSource::new(clip.left, clip.right)
        }
        None => LoopSource::clicks(sample_rate, args.click_interval),
    };

    let params = Arc::new(ReverbParams::new());
    args.params.apply(&params);

    let mut engine = ReverbEngine::new(Arc::clone(&params));
    engine.prepare(sample_rate as f64, MAX_BLOCK_SIZE)?;

    let (mut control_tx, mut control_rx) = RingBuffer::<EngineMessage>::new(16);

    println!("=== verb ===");
    println!("Sample rate: {} Hz", sample_rate);
    println!("Channels: {}", channels);
    print_params(&params);
    println!();
    println!("Commands: <PARAM> <value> (ROOMSIZE, DAMPING, WET, DRY, WIDTH), mute, show, quit");
    println!();

    let mut left = vec![0.0f32; MAX_BLOCK_SIZE];
    let mut right = vec![0.0f32; MAX_BLOCK_SIZE];

    let stream = device.build_output_stream(
        &config.into(),
        move |data: &mut [f32], _| {
            engine.drain_messages(&mut control_rx);

            let total_frames = data.len() / channels;
            let mut frames_written = 0;

            while frames_written < total_frames {
                let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                let l = &mut left[..frames_to_render];
                let r = &mut right[..frames_to_render];

                source.fill(l, r);
                if engine.process_block(l, r).is_err() {
                    l.fill(0.0);
                    r.fill(0.0);
                }

                let out_off = frames_written * channels;
                interleave(
                    l,
                    r,
                    channels,
                    &mut data[out_off..out_off + frames_to_render * channels],
                );

                frames_written += frames_to_render;
            }
        },
        |err| log::error!("audio stream error: {}", err),
        None,
    )?;

    stream.play()?;
    log::info!("live playback started");

    for line in io::stdin().lock().lines() {
        let line = line.wrap_err("failed to read stdin")?;
        match parse_command(&line) {
            Ok(ControlCommand::Set(param, value)) => params.set(param, value),
            Ok(ControlCommand::Mute) => {
                if control_tx.push(EngineMessage::Mute).is_err() {
                    log::warn!("control queue full, mute dropped");
                }
            }
            Ok(ControlCommand::Show) => print_params(&params),
            Ok(ControlCommand::Quit) => break,
            Err(message) => eprintln!("{message}"),
        }
    }

    drop(stream);
    log::info!("live playback stopped");
    Ok(())
}
