//! verb - stereo reverb for WAV files and live playback
//!
//! Run with: cargo run -- render input.wav output.wav --wet 0.4

mod live;
mod render;
mod wav;

use clap::{Args, Parser, Subcommand};
use stereo_verb::{ParamId, ReverbParams};

#[derive(Parser, Debug)]
#[command(name = "verb", version, about = "Stereo Schroeder/Freeverb-style reverb")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Process a WAV file offline
    Render(render::RenderArgs),
    /// Loop a WAV file (or a click train) through the reverb on the default output device
    Live(live::LiveArgs),
}

/// Initial values for the five reverb controls
#[derive(Args, Debug, Clone)]
pub struct ParamArgs {
    /// Room size, 0 (small) to 1 (large)
    #[arg(long, default_value_t = ParamId::RoomSize.default_value())]
    room_size: f32,
    /// High-frequency damping, 0 (bright) to 1 (dark)
    #[arg(long, default_value_t = ParamId::Damping.default_value())]
    damping: f32,
    /// Reverberated signal level
    #[arg(long, default_value_t = ParamId::Wet.default_value())]
    wet: f32,
    /// Original signal level
    #[arg(long, default_value_t = ParamId::Dry.default_value())]
    dry: f32,
    /// Stereo width of the reverb, 0 (mono) to 1 (wide)
    #[arg(long, default_value_t = ParamId::Width.default_value())]
    width: f32,
}

impl ParamArgs {
    /// Store every value; out-of-range values are clamped by the store
    pub fn apply(&self, params: &ReverbParams) {
        params.set(ParamId::RoomSize, self.room_size);
        params.set(ParamId::Damping, self.damping);
        params.set(ParamId::Wet, self.wet);
        params.set(ParamId::Dry, self.dry);
        params.set(ParamId::Width, self.width);
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Render(args) => render::run(args),
        Command::Live(args) => live::run(args),
    }
}
