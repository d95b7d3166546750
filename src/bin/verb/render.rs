//! Offline rendering of WAV files

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use color_eyre::eyre::{eyre, Result as EyreResult};
use stereo_verb::host::TAIL_LENGTH_SECONDS;
use stereo_verb::{ReverbEngine, ReverbParams, MAX_BLOCK_SIZE};

use super::wav::{read_stereo, write_stereo};
use super::ParamArgs;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Input WAV file (mono or stereo)
    input: PathBuf,
    /// Output WAV file (stereo, 32-bit float)
    output: PathBuf,
    #[command(flatten)]
    params: ParamArgs,
    /// Samples per processing block
    #[arg(long, default_value_t = 512)]
    block_size: usize,
    /// Seconds of silence appended so the tail can ring out
    #[arg(long, default_value_t = TAIL_LENGTH_SECONDS)]
    tail: f64,
}

pub fn run(args: RenderArgs) -> EyreResult<()> {
    if args.block_size == 0 || args.block_size > MAX_BLOCK_SIZE {
        return Err(eyre!(
            "block size must be between 1 and {}, got {}",
            MAX_BLOCK_SIZE,
            args.block_size
        ));
    }

    let mut clip = read_stereo(&args.input)?;

    let tail_frames = (args.tail.max(0.0) * clip.sample_rate as f64) as usize;
    let total = clip.frames() + tail_frames;
    clip.left.resize(total, 0.0);
    clip.right.resize(total, 0.0);

    let params = Arc::new(ReverbParams::new());
    args.params.apply(&params);

    let mut engine = ReverbEngine::new(params);
    engine.prepare(clip.sample_rate as f64, args.block_size)?;

    for (left, right) in clip
        .left
        .chunks_mut(args.block_size)
        .zip(clip.right.chunks_mut(args.block_size))
    {
        engine.process_block(left, right)?;
    }

    write_stereo(&args.output, &clip)?;

    log::info!(
        "rendered {} frames ({} tail) to {}",
        total,
        tail_frames,
        args.output.display()
    );
    println!("Rendered {} frames to {}", total, args.output.display());

    Ok(())
}
