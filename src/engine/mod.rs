//! Reverb engine: lifecycle, parameter mapping and wet/dry mixing.
//!
//! ```text
//! ReverbParams ──(once per block)──→ update_params ──→ comb feedback / damp
//!                                                   └─→ wet1 / wet2 / dry
//!
//! L ─┐                        ┌─→ outL ─┐
//!    ├─→ (L+R)·gain ─→ FilterBank         ├─→ width cross-mix + dry ─→ L, R
//! R ─┘                        └─→ outR ─┘
//! ```
//!
//! The engine starts Unconfigured. [`ReverbEngine::prepare`] allocates the
//! filter bank and moves it to Ready; calling it again throws the old bank
//! away and starts from silence. Only Ready engines process audio.

pub mod message;
pub mod params;

use std::sync::Arc;

use crate::dsp::bank::FilterBank;
use crate::dsp::tuning::{damping_to_coef, room_to_feedback, FIXED_GAIN};
use crate::error::{ConfigError, Result};
use crate::host::TAIL_LENGTH_SECONDS;
use crate::MAX_BLOCK_SIZE;

use self::message::{EngineMessage, MessageReceiver};
use self::params::{ParamId, ParamSnapshot, ReverbParams};

/// Stream settings the engine is prepared for
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub sample_rate: f64,
    pub max_block_size: usize,
}

impl EngineConfig {
    pub fn new(sample_rate: f64, max_block_size: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !self.sample_rate.is_finite() || self.sample_rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(self.sample_rate));
        }
        if self.max_block_size == 0 {
            return Err(ConfigError::InvalidBlockSize(self.max_block_size));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new(48_000.0, MAX_BLOCK_SIZE)
    }
}

/// Output gains derived from wet, dry and width
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MixCoefficients {
    /// Gain of a channel's own wet signal
    pub wet1: f32,
    /// Gain of the opposite channel's wet signal
    pub wet2: f32,
    pub dry: f32,
}

impl MixCoefficients {
    /// `width = 1` keeps channels independent, `width = 0` gives both the
    /// same half-and-half blend.
    pub fn new(wet: f32, dry: f32, width: f32) -> Self {
        Self {
            wet1: wet * (width / 2.0 + 0.5),
            wet2: wet * ((1.0 - width) / 2.0),
            dry,
        }
    }
}

enum EngineState {
    Unconfigured,
    Ready {
        config: EngineConfig,
        bank: FilterBank,
    },
}

/// Stereo reverberator driven by externally owned parameters
pub struct ReverbEngine {
    params: Arc<ReverbParams>,
    state: EngineState,
    live: ParamSnapshot,
    feedback: f32,
    damp: f32,
    mix: MixCoefficients,
}

impl ReverbEngine {
    /// Create an unconfigured engine reading from `params`.
    ///
    /// Coefficients are derived immediately so they are valid as soon as
    /// [`prepare`](Self::prepare) succeeds.
    pub fn new(params: Arc<ReverbParams>) -> Self {
        let mut engine = Self {
            params,
            state: EngineState::Unconfigured,
            live: ParamSnapshot::default(),
            feedback: 0.0,
            damp: 0.0,
            mix: MixCoefficients::new(0.0, 0.0, 0.0),
        };
        engine.update_params();
        engine
    }

    /// Shared parameter store; clone the `Arc` to hand it to a control thread
    pub fn params(&self) -> &Arc<ReverbParams> {
        &self.params
    }

    /// Allocate and slice the delay buffers for a stream.
    ///
    /// Re-entrant: a second call discards every delay line and loop filter
    /// and starts from silence. Must not run concurrently with
    /// [`process_block`](Self::process_block).
    pub fn prepare(&mut self, sample_rate: f64, max_block_size: usize) -> Result<()> {
        let config = EngineConfig::new(sample_rate, max_block_size);
        config.validate()?;

        if self.is_ready() {
            log::debug!("re-preparing reverb, discarding filter state");
        }

        let mut bank = FilterBank::new()?;
        bank.set_feedback(self.feedback);
        bank.set_damp(self.damp);

        log::info!(
            "reverb prepared: {} Hz, max block {}, comb buffer {} samples, allpass buffer {} samples",
            config.sample_rate,
            config.max_block_size,
            bank.comb_arena_len(),
            bank.allpass_arena_len()
        );

        self.state = EngineState::Ready { config, bank };
        Ok(())
    }

    /// Drop the delay buffers and return to Unconfigured
    pub fn release(&mut self) {
        if self.is_ready() {
            log::debug!("releasing reverb buffers");
        }
        self.state = EngineState::Unconfigured;
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, EngineState::Ready { .. })
    }

    pub fn config(&self) -> Option<EngineConfig> {
        match &self.state {
            EngineState::Ready { config, .. } => Some(*config),
            EngineState::Unconfigured => None,
        }
    }

    pub fn bank(&self) -> Option<&FilterBank> {
        match &self.state {
            EngineState::Ready { bank, .. } => Some(bank),
            EngineState::Unconfigured => None,
        }
    }

    /// Read all five parameters and recompute coefficients.
    ///
    /// Coefficients are a pure function of the values read here, so no
    /// history leaks from earlier settings.
    pub fn update_params(&mut self) {
        let live = ParamSnapshot {
            room_size: self.params.get(ParamId::RoomSize),
            damping: self.params.get(ParamId::Damping),
            wet: self.params.get(ParamId::Wet),
            dry: self.params.get(ParamId::Dry),
            width: self.params.get(ParamId::Width),
        }
        .sanitized();

        self.feedback = room_to_feedback(live.room_size);
        self.damp = damping_to_coef(live.damping);
        self.mix = MixCoefficients::new(live.wet, live.dry, live.width);
        self.live = live;

        if let EngineState::Ready { bank, .. } = &mut self.state {
            bank.set_feedback(self.feedback);
            bank.set_damp(self.damp);
        }
    }

    /// Values seen by the last [`update_params`](Self::update_params)
    pub fn live_params(&self) -> ParamSnapshot {
        self.live
    }

    /// Current comb loop gain
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Current comb lowpass coefficient
    pub fn damp(&self) -> f32 {
        self.damp
    }

    pub fn mix(&self) -> MixCoefficients {
        self.mix
    }

    /// Zero every delay line. No-op while unconfigured.
    pub fn mute(&mut self) {
        if let EngineState::Ready { bank, .. } = &mut self.state {
            bank.mute();
        }
    }

    /// Apply every pending control message. Call at a block boundary.
    pub fn drain_messages<R: MessageReceiver + ?Sized>(&mut self, receiver: &mut R) -> usize {
        let mut handled = 0;
        while let Some(message) = receiver.pop() {
            match message {
                EngineMessage::Mute => self.mute(),
            }
            handled += 1;
        }
        handled
    }

    /// Process one block in place.
    ///
    /// Errors are only returned for shape problems found before any sample
    /// is touched; the buffers are left unchanged in that case.
    pub fn process_block(&mut self, left: &mut [f32], right: &mut [f32]) -> Result<()> {
        if left.len() != right.len() {
            return Err(ConfigError::ChannelMismatch {
                left: left.len(),
                right: right.len(),
            });
        }
        let max = self.config().ok_or(ConfigError::NotPrepared)?.max_block_size;
        if left.len() > max {
            return Err(ConfigError::BlockTooLarge {
                len: left.len(),
                max,
            });
        }

        self.update_params();

        // Block-constant, so hoisted out of the sample loop
        let MixCoefficients { wet1, wet2, dry } = self.mix;

        let EngineState::Ready { bank, .. } = &mut self.state else {
            return Err(ConfigError::NotPrepared);
        };

        for (l, r) in left.iter_mut().zip(right.iter_mut()) {
            let input = (*l + *r) * FIXED_GAIN;
            let (out_l, out_r) = bank.process_sample(input);

            *l = out_l * wet1 + out_r * wet2 + *l * dry;
            *r = out_r * wet1 + out_l * wet2 + *r * dry;
        }

        Ok(())
    }

    /// How long output keeps ringing after input stops
    pub fn tail_length_seconds(&self) -> f64 {
        TAIL_LENGTH_SECONDS
    }
}

impl Default for ReverbEngine {
    fn default() -> Self {
        Self::new(Arc::new(ReverbParams::new()))
    }
}
