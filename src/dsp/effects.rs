//! Effect chain for rendered sounds.
//!
//! Enabled effects run in a fixed order: filter, distortion, modulation,
//! delay, reverb. Settings are fixed per effect; a sound only toggles them.

use std::f64::consts::PI;

use super::delay::Delay;
use super::filter::{BiquadFilter, FilterType};
use super::reverb::Reverb;
use crate::sound::{Effect, SoundParameters};

const FILTER_CUTOFF_RATIO: f64 = 2.0;
const FILTER_Q: f64 = 0.9;
const DRIVE: f32 = 4.0;
const TREMOLO_RATE_HZ: f64 = 12.0;
const TREMOLO_DEPTH: f64 = 0.5;
const DELAY_TIME: f64 = 0.08;
const DELAY_FEEDBACK: f64 = 0.35;
const DELAY_MIX: f64 = 0.35;
const REVERB_ROOM: f64 = 0.5;
const REVERB_DAMPING: f64 = 0.4;
const REVERB_MIX: f64 = 0.25;

const CHAIN: [Effect; 5] = [
    Effect::Filter,
    Effect::Distortion,
    Effect::Modulation,
    Effect::Delay,
    Effect::Reverb,
];

/// Apply every enabled effect of `params` to `buffer` in place.
pub fn apply_effects(buffer: &mut [f32], params: &SoundParameters, sample_rate: f64) {
    for effect in CHAIN {
        if !params.is_enabled(effect) {
            continue;
        }
        match effect {
            Effect::Filter => {
                let cutoff = params.frequency * FILTER_CUTOFF_RATIO;
                BiquadFilter::new(FilterType::Lowpass, cutoff, FILTER_Q, sample_rate)
                    .process_block(buffer);
            }
            Effect::Distortion => distort(buffer, DRIVE),
            Effect::Modulation => tremolo(buffer, sample_rate, TREMOLO_RATE_HZ, TREMOLO_DEPTH),
            Effect::Delay => {
                Delay::new(sample_rate, DELAY_TIME, DELAY_FEEDBACK, DELAY_MIX).process_block(buffer)
            }
            Effect::Reverb => {
                Reverb::new(sample_rate, REVERB_ROOM, REVERB_DAMPING, REVERB_MIX)
                    .process_block(buffer)
            }
        }
    }
}

/// tanh waveshaper, normalised so a full-scale input stays full scale.
pub fn distort(buffer: &mut [f32], drive: f32) {
    let norm = drive.tanh();
    for sample in buffer.iter_mut() {
        *sample = (*sample * drive).tanh() / norm;
    }
}

/// Amplitude modulation by a sine LFO. `depth` 0 leaves the signal untouched.
pub fn tremolo(buffer: &mut [f32], sample_rate: f64, rate_hz: f64, depth: f64) {
    let depth = depth.clamp(0.0, 1.0);
    for (i, sample) in buffer.iter_mut().enumerate() {
        let lfo = 0.5 * (1.0 + (2.0 * PI * rate_hz * i as f64 / sample_rate).sin());
        let gain = 1.0 - depth * lfo;
        *sample = (*sample as f64 * gain) as f32;
    }
}
