//! Voice synthesis — one dry buffer per sound type, before effects.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use super::envelope::{Adsr, exp_decay};
use super::filter::{BiquadFilter, FilterType};
use super::oscillator::{Oscillator, Waveform};
use crate::sound::{SoundParameters, Voice};

const DEFAULT_HARMONICS: u32 = 3;
const DEFAULT_SWEEP_RANGE: f64 = 2.0;
const DEFAULT_PULSE_RATE: f64 = 8.0;
/// Noise is seeded so a click renders identically every time.
const CLICK_NOISE_SEED: u64 = 0x5eed_c11c;

/// Render the dry voice of `params`: `duration × sample_rate` mono samples.
pub fn synthesize(params: &SoundParameters, sample_rate: f64) -> Vec<f32> {
    let len = (params.duration.max(0.0) * sample_rate).round() as usize;
    let freq = params.frequency;

    match &params.voice {
        Voice::Tone {
            attack,
            decay,
            sustain,
            release,
        } => {
            let defaults = Adsr::default();
            let env = Adsr {
                attack: attack.unwrap_or(defaults.attack),
                decay: decay.unwrap_or(defaults.decay),
                sustain: sustain.unwrap_or(defaults.sustain),
                release: release.unwrap_or(defaults.release),
            };
            tone(len, freq, env, params.duration, sample_rate)
        }
        Voice::Chime { harmonics } => {
            chime(len, freq, harmonics.unwrap_or(DEFAULT_HARMONICS), params.duration, sample_rate)
        }
        Voice::Click => click(len, freq, sample_rate),
        Voice::Sweep { sweep_range } => {
            sweep(len, freq, sweep_range.unwrap_or(DEFAULT_SWEEP_RANGE), params.duration, sample_rate)
        }
        Voice::Pulse { pulse_rate } => {
            pulse(len, freq, pulse_rate.unwrap_or(DEFAULT_PULSE_RATE), sample_rate)
        }
    }
}

fn tone(len: usize, freq: f64, env: Adsr, duration: f64, sample_rate: f64) -> Vec<f32> {
    let mut osc = Oscillator::new(Waveform::Sine, freq, sample_rate);
    (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate;
            (osc.next_sample() * env.level_at(t, duration)) as f32
        })
        .collect()
}

/// Stack of partials at k×f with 1/k amplitude; higher partials die faster.
fn chime(len: usize, freq: f64, harmonics: u32, duration: f64, sample_rate: f64) -> Vec<f32> {
    let partials = harmonics.max(1);
    let mut oscillators: Vec<Oscillator> = (1..=partials)
        .map(|k| Oscillator::new(Waveform::Sine, freq * k as f64, sample_rate))
        .collect();
    let norm: f64 = (1..=partials).map(|k| 1.0 / k as f64).sum();
    let tau = duration / 3.0;

    (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let sum: f64 = oscillators
                .iter_mut()
                .enumerate()
                .map(|(k, osc)| {
                    let k = (k + 1) as f64;
                    osc.next_sample() / k * exp_decay(t, tau / k)
                })
                .sum();
            (sum / norm) as f32
        })
        .collect()
}

/// Band-passed noise burst over a fast sine blip.
fn click(len: usize, freq: f64, sample_rate: f64) -> Vec<f32> {
    let mut rng = SmallRng::seed_from_u64(CLICK_NOISE_SEED);
    let mut band = BiquadFilter::new(FilterType::Bandpass, freq, 1.5, sample_rate);
    let mut osc = Oscillator::new(Waveform::Sine, freq, sample_rate);
    let tau = 0.004;

    (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let noise = band.process(rng.gen_range(-1.0..1.0));
            let body = 0.6 * osc.next_sample() + 0.8 * noise;
            (body * exp_decay(t, tau)) as f32
        })
        .collect()
}

/// Exponential glide from `freq` to `freq × range` over the whole sound.
fn sweep(len: usize, freq: f64, range: f64, duration: f64, sample_rate: f64) -> Vec<f32> {
    let mut osc = Oscillator::new(Waveform::Sine, freq, sample_rate);
    let env = Adsr {
        attack: 0.005,
        decay: 0.0,
        sustain: 1.0,
        release: duration * 0.3,
    };

    (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let progress = if duration > 0.0 { t / duration } else { 0.0 };
            osc.frequency = freq * range.max(f64::MIN_POSITIVE).powf(progress);
            (osc.next_sample() * env.level_at(t, duration)) as f32
        })
        .collect()
}

/// Square wave retriggered `rate` times per second with a short decay per hit.
fn pulse(len: usize, freq: f64, rate: f64, sample_rate: f64) -> Vec<f32> {
    let mut osc = Oscillator::new(Waveform::Square, freq, sample_rate);
    let period = if rate > 0.0 { 1.0 / rate } else { f64::INFINITY };
    let tau = period * 0.25;

    (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let since_hit = t % period;
            (0.5 * osc.next_sample() * exp_decay(since_hit, tau)) as f32
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sound::SoundType;

    fn peak(buffer: &[f32]) -> f32 {
        buffer.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn every_type_renders_expected_length() {
        for ty in [
            SoundType::Tone,
            SoundType::Chime,
            SoundType::Click,
            SoundType::Sweep,
            SoundType::Pulse,
        ] {
            let params = SoundParameters::new(Voice::bare(ty), 600.0, 0.25);
            let buffer = synthesize(&params, 8000.0);
            assert_eq!(buffer.len(), 2000, "{ty:?}");
            assert!(buffer.iter().all(|s| s.is_finite()), "{ty:?} not finite");
            assert!(peak(&buffer) > 0.01, "{ty:?} is silent");
            assert!(peak(&buffer) <= 1.5, "{ty:?} too loud");
        }
    }

    #[test]
    fn click_is_deterministic() {
        let params = SoundParameters::new(Voice::Click, 2000.0, 0.05);
        assert_eq!(synthesize(&params, 22050.0), synthesize(&params, 22050.0));
    }

    #[test]
    fn click_decays_quickly() {
        let params = SoundParameters::new(Voice::Click, 2000.0, 0.1);
        let buffer = synthesize(&params, 44100.0);
        let head = peak(&buffer[..441]);
        let tail = peak(&buffer[2205..]);
        assert!(tail < head * 0.01, "head {head}, tail {tail}");
    }

    #[test]
    fn pulse_retriggers() {
        let params = SoundParameters::new(Voice::Pulse { pulse_rate: Some(10.0) }, 500.0, 0.3);
        let buffer = synthesize(&params, 10000.0);
        // Each 100 ms period starts loud and ends quiet.
        for hit in 0..3 {
            let start = hit * 1000;
            let head = peak(&buffer[start..start + 50]);
            let tail = peak(&buffer[start + 900..start + 1000]);
            assert!(head > tail * 5.0, "hit {hit}: head {head}, tail {tail}");
        }
    }

    #[test]
    fn tone_uses_envelope_fields() {
        let slow = SoundParameters::new(
            Voice::Tone {
                attack: Some(0.1),
                decay: None,
                sustain: None,
                release: None,
            },
            440.0,
            0.5,
        );
        let buffer = synthesize(&slow, 44100.0);
        // Still ramping up in the first 10 ms of a 100 ms attack.
        assert!(peak(&buffer[..441]) < 0.15);
    }
}
