//! Control parameters shared between the control thread and the audio thread.
//!
//! Each parameter is an independent atomic f32 (stored as bits in an
//! `AtomicU32`). The audio side reads all five once per block with relaxed
//! loads; there is no attempt to snapshot them together, so a block may see
//! one parameter updated and another not yet. That is accepted.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable parameter identifiers
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamId {
    /// Room size (0.0 = small, 1.0 = large)
    RoomSize,
    /// High-frequency damping (0.0 = bright, 1.0 = dark)
    Damping,
    /// Reverberated signal level
    Wet,
    /// Original signal level
    Dry,
    /// Stereo width of the wet signal (0.0 = mono, 1.0 = wide)
    Width,
}

impl ParamId {
    pub const ALL: [ParamId; 5] = [
        ParamId::RoomSize,
        ParamId::Damping,
        ParamId::Wet,
        ParamId::Dry,
        ParamId::Width,
    ];

    /// Identifier used by hosts and persisted state
    pub fn id(self) -> &'static str {
        match self {
            ParamId::RoomSize => "ROOMSIZE",
            ParamId::Damping => "DAMPING",
            ParamId::Wet => "WET",
            ParamId::Dry => "DRY",
            ParamId::Width => "WIDTH",
        }
    }

    /// Human-readable label
    pub fn name(self) -> &'static str {
        match self {
            ParamId::RoomSize => "Room Size",
            ParamId::Damping => "Tone / Damping",
            ParamId::Wet => "Wet",
            ParamId::Dry => "Dry",
            ParamId::Width => "Width",
        }
    }

    pub fn default_value(self) -> f32 {
        match self {
            ParamId::RoomSize => 0.5,
            ParamId::Damping => 0.5,
            ParamId::Wet => 0.33,
            ParamId::Dry => 0.7,
            ParamId::Width => 1.0,
        }
    }

    /// Look up a parameter by identifier, ignoring case
    pub fn from_id(id: &str) -> Option<ParamId> {
        Self::ALL
            .into_iter()
            .find(|param| param.id().eq_ignore_ascii_case(id))
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Clamp to the normalized range. NaN falls back to the default.
fn sanitize(param: ParamId, value: f32) -> f32 {
    if value.is_nan() {
        param.default_value()
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Lock-free parameter store, written by the control side and read by the
/// audio side
#[derive(Debug)]
pub struct ReverbParams {
    values: [AtomicU32; 5],
}

impl ReverbParams {
    pub fn new() -> Self {
        Self {
            values: ParamId::ALL.map(|param| AtomicU32::new(param.default_value().to_bits())),
        }
    }

    /// Store a value, clamped to `[0, 1]`
    pub fn set(&self, param: ParamId, value: f32) {
        self.values[param.index()].store(sanitize(param, value).to_bits(), Ordering::Relaxed);
    }

    /// Wait-free read of the latest value
    #[inline]
    pub fn get(&self, param: ParamId) -> f32 {
        f32::from_bits(self.values[param.index()].load(Ordering::Relaxed))
    }

    /// Copy out every value, one independent load each
    pub fn snapshot(&self) -> ParamSnapshot {
        ParamSnapshot {
            room_size: self.get(ParamId::RoomSize),
            damping: self.get(ParamId::Damping),
            wet: self.get(ParamId::Wet),
            dry: self.get(ParamId::Dry),
            width: self.get(ParamId::Width),
        }
    }

    /// Overwrite every value from a previously captured snapshot
    pub fn restore(&self, snapshot: &ParamSnapshot) {
        for param in ParamId::ALL {
            self.set(param, snapshot.get(param));
        }
    }

    pub fn reset_to_defaults(&self) {
        self.restore(&ParamSnapshot::default());
    }
}

impl Default for ReverbParams {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain copy of all five parameters.
///
/// This is what an external persistence layer saves and restores.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSnapshot {
    pub room_size: f32,
    pub damping: f32,
    pub wet: f32,
    pub dry: f32,
    pub width: f32,
}

impl ParamSnapshot {
    pub fn get(&self, param: ParamId) -> f32 {
        match param {
            ParamId::RoomSize => self.room_size,
            ParamId::Damping => self.damping,
            ParamId::Wet => self.wet,
            ParamId::Dry => self.dry,
            ParamId::Width => self.width,
        }
    }

    pub fn set(&mut self, param: ParamId, value: f32) {
        let value = sanitize(param, value);
        match param {
            ParamId::RoomSize => self.room_size = value,
            ParamId::Damping => self.damping = value,
            ParamId::Wet => self.wet = value,
            ParamId::Dry => self.dry = value,
            ParamId::Width => self.width = value,
        }
    }

    /// Every field clamped to `[0, 1]`
    pub fn sanitized(&self) -> Self {
        let mut out = *self;
        for param in ParamId::ALL {
            out.set(param, self.get(param));
        }
        out
    }
}

impl Default for ParamSnapshot {
    fn default() -> Self {
        Self {
            room_size: ParamId::RoomSize.default_value(),
            damping: ParamId::Damping.default_value(),
            wet: ParamId::Wet.default_value(),
            dry: ParamId::Dry.default_value(),
            width: ParamId::Width.default_value(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_defaults() {
        let params = ReverbParams::new();
        assert_eq!(params.get(ParamId::RoomSize), 0.5);
        assert_eq!(params.get(ParamId::Damping), 0.5);
        assert_eq!(params.get(ParamId::Wet), 0.33);
        assert_eq!(params.get(ParamId::Dry), 0.7);
        assert_eq!(params.get(ParamId::Width), 1.0);
    }

    #[test]
    fn test_set_clamps_out_of_range() {
        let params = ReverbParams::new();
        params.set(ParamId::RoomSize, 1.7);
        params.set(ParamId::Wet, -0.2);
        params.set(ParamId::Dry, f32::NAN);

        assert_eq!(params.get(ParamId::RoomSize), 1.0);
        assert_eq!(params.get(ParamId::Wet), 0.0);
        assert_eq!(params.get(ParamId::Dry), 0.7);
    }

    #[test]
    fn test_ids_round_trip() {
        for param in ParamId::ALL {
            assert_eq!(ParamId::from_id(param.id()), Some(param));
        }
        assert_eq!(ParamId::from_id("roomsize"), Some(ParamId::RoomSize));
        assert_eq!(ParamId::from_id("gain"), None);
    }

    #[test]
    fn test_snapshot_restore() {
        let params = ReverbParams::new();
        let mut snapshot = ParamSnapshot::default();
        snapshot.set(ParamId::Width, 0.25);
        snapshot.set(ParamId::Damping, 0.9);

        params.restore(&snapshot);

        assert_eq!(params.snapshot(), snapshot);
        params.reset_to_defaults();
        assert_eq!(params.snapshot(), ParamSnapshot::default());
    }

    #[test]
    fn test_updates_visible_across_threads() {
        let params = Arc::new(ReverbParams::new());
        let writer = {
            let params = Arc::clone(&params);
            std::thread::spawn(move || params.set(ParamId::Wet, 0.8))
        };
        writer.join().unwrap();

        assert_eq!(params.get(ParamId::Wet), 0.8);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_snapshot_serde_fills_missing_fields() {
        let snapshot: ParamSnapshot = serde_json::from_str(r#"{"wet": 0.1}"#).unwrap();
        assert_eq!(snapshot.wet, 0.1);
        assert_eq!(snapshot.dry, 0.7);
    }
}
