//! Sound parameter types.
//!
//! A `SoundParameters` record describes how to synthesize one short UI
//! sound. The JSON shape is flat (`{"type": "tone", "frequency": 800, ...}`)
//! and matches what the web app stores, but the type-specific fields live in
//! the `Voice` union so a click can never carry harmonics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{InvalidField, SfxError};
use crate::variation::{Bounds, bounds};

// ── Sound Parameters ────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundParameters {
    /// Synthesis kind plus its kind-specific fields.
    #[serde(flatten)]
    pub voice: Voice,
    /// Base frequency in Hz.
    pub frequency: f64,
    /// Duration in seconds.
    pub duration: f64,
    /// Effect enable flags.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effects: Option<Effects>,
}

/// Synthesis kind, tagged by `type` in JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Voice {
    Tone {
        /// Attack time in seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        attack: Option<f64>,
        /// Decay time in seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        decay: Option<f64>,
        /// Sustain level [0.0, 1.0].
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sustain: Option<f64>,
        /// Release time in seconds.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        release: Option<f64>,
    },
    Chime {
        /// Number of partials.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        harmonics: Option<u32>,
    },
    Click,
    Sweep {
        /// End-to-start frequency ratio of the glide.
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "sweepRange"
        )]
        sweep_range: Option<f64>,
    },
    Pulse {
        /// Gate rate in Hz.
        #[serde(
            default,
            skip_serializing_if = "Option::is_none",
            rename = "pulseRate"
        )]
        pulse_rate: Option<f64>,
    },
}

/// Closed set of synthesis kinds, without their fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundType {
    Tone,
    Chime,
    Click,
    Sweep,
    Pulse,
}

impl SoundType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundType::Tone => "tone",
            SoundType::Chime => "chime",
            SoundType::Click => "click",
            SoundType::Sweep => "sweep",
            SoundType::Pulse => "pulse",
        }
    }
}

impl Voice {
    pub fn sound_type(&self) -> SoundType {
        match self {
            Voice::Tone { .. } => SoundType::Tone,
            Voice::Chime { .. } => SoundType::Chime,
            Voice::Click => SoundType::Click,
            Voice::Sweep { .. } => SoundType::Sweep,
            Voice::Pulse { .. } => SoundType::Pulse,
        }
    }

    /// A voice of the given kind with no optional fields set.
    pub fn bare(sound_type: SoundType) -> Self {
        match sound_type {
            SoundType::Tone => Voice::Tone {
                attack: None,
                decay: None,
                sustain: None,
                release: None,
            },
            SoundType::Chime => Voice::Chime { harmonics: None },
            SoundType::Click => Voice::Click,
            SoundType::Sweep => Voice::Sweep { sweep_range: None },
            SoundType::Pulse => Voice::Pulse { pulse_rate: None },
        }
    }
}

// ── Effects ─────────────────────────────────────────────────

/// Effects a sound can toggle. Declaration order is the processing order
/// used when iterating an `Effects` map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Reverb,
    Delay,
    Filter,
    Distortion,
    Modulation,
}

impl Effect {
    pub const ALL: [Effect; 5] = [
        Effect::Reverb,
        Effect::Delay,
        Effect::Filter,
        Effect::Distortion,
        Effect::Modulation,
    ];
}

/// Effect name → enabled.
pub type Effects = BTreeMap<Effect, bool>;

/// An effects map with every known effect disabled.
pub fn all_effects_off() -> Effects {
    Effect::ALL.iter().map(|&e| (e, false)).collect()
}

// ── Validation ──────────────────────────────────────────────

impl SoundParameters {
    pub fn new(voice: Voice, frequency: f64, duration: f64) -> Self {
        SoundParameters {
            voice,
            frequency,
            duration,
            effects: None,
        }
    }

    pub fn sound_type(&self) -> SoundType {
        self.voice.sound_type()
    }

    pub fn is_enabled(&self, effect: Effect) -> bool {
        self.effects
            .as_ref()
            .and_then(|fx| fx.get(&effect).copied())
            .unwrap_or(false)
    }

    /// Boundary check for records coming from the store, the CLI or JS.
    ///
    /// Frequency and duration must already sit inside the ranges variants
    /// are clamped to. The variation generator never calls this.
    pub fn validate(&self) -> Result<(), SfxError> {
        within("frequency", self.frequency, bounds::FREQUENCY, "100..=4000 Hz")?;
        within("duration", self.duration, bounds::DURATION, "0.05..=2 s")?;

        match &self.voice {
            Voice::Tone {
                attack,
                decay,
                sustain,
                release,
            } => {
                non_negative("attack", *attack)?;
                non_negative("decay", *decay)?;
                non_negative("release", *release)?;
                if let Some(s) = *sustain {
                    if !(0.0..=1.0).contains(&s) {
                        return Err(invalid("sustain", s, "a level in 0..=1"));
                    }
                }
            }
            Voice::Chime {
                harmonics: Some(0),
            } => return Err(invalid("harmonics", 0.0, "at least 1")),
            Voice::Sweep {
                sweep_range: Some(r),
            } => positive("sweepRange", *r)?,
            Voice::Pulse {
                pulse_rate: Some(r),
            } => positive("pulseRate", *r)?,
            _ => {}
        }
        Ok(())
    }
}

fn invalid(field: &'static str, value: f64, expected: &'static str) -> SfxError {
    SfxError::InvalidSound(InvalidField::new(field, value, expected))
}

fn within(
    field: &'static str,
    value: f64,
    range: Bounds,
    expected: &'static str,
) -> Result<(), SfxError> {
    if range.contains(value) {
        Ok(())
    } else {
        Err(invalid(field, value, expected))
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), SfxError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "a finite value > 0"))
    }
}

fn non_negative(field: &'static str, value: Option<f64>) -> Result<(), SfxError> {
    match value {
        Some(v) if !(v.is_finite() && v >= 0.0) => Err(invalid(field, v, "a finite value >= 0")),
        _ => Ok(()),
    }
}
