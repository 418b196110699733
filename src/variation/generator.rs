//! Variation generator — bounded random mutation of a base sound's parameters.
//!
//! Each call starts from a copy of the base and mutates only the fields the
//! profile asks for. Randomness comes from an injected `Rng` so a fixed seed
//! reproduces a batch exactly.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::config::{Direction, VariationParameters};
use crate::sound::{SoundParameters, Voice};

// ── Field Bounds ────────────────────────────────────────────

/// Inclusive range a mutated field is clamped into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
}

impl Bounds {
    pub const fn new(min: f64, max: f64) -> Self {
        Bounds { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub mod bounds {
    use super::Bounds;

    /// Seconds.
    pub const DURATION: Bounds = Bounds::new(0.05, 2.0);
    /// Hz.
    pub const FREQUENCY: Bounds = Bounds::new(100.0, 4000.0);
    pub const ATTACK: Bounds = Bounds::new(0.001, 0.1);
    pub const DECAY: Bounds = Bounds::new(0.001, 0.2);
    pub const SUSTAIN: Bounds = Bounds::new(0.0, 1.0);
    pub const RELEASE: Bounds = Bounds::new(0.001, 0.5);
    pub const HARMONICS: Bounds = Bounds::new(2.0, 5.0);
    pub const PULSE_RATE: Bounds = Bounds::new(2.0, 20.0);
    pub const SWEEP_RANGE: Bounds = Bounds::new(0.5, 4.0);
}

/// Share of the mutation kept when `preserve_character` is on.
const PRESERVE_RATIO: f64 = 0.5;

// ── Factor Helpers ──────────────────────────────────────────

/// Draw a multiplicative factor around 1.0.
///
/// `variance` is a fraction (0.1 = ±10%). `Up` only grows the value,
/// `Down` only shrinks it, `Both` is symmetric.
pub fn bias_factor<R: Rng + ?Sized>(rng: &mut R, variance: f64, direction: Direction) -> f64 {
    let u: f64 = rng.gen_range(0.0..1.0);
    match direction {
        Direction::Up => 1.0 + u * variance,
        Direction::Down => 1.0 - u * variance,
        Direction::Both => 1.0 + (u - 0.5) * 2.0 * variance,
    }
}

/// Symmetric variation of `base`, clamped into `bounds`.
pub fn vary_bounded<R: Rng + ?Sized>(rng: &mut R, base: f64, variance: f64, bounds: Bounds) -> f64 {
    bounds.clamp(base * bias_factor(rng, variance, Direction::Both))
}

fn preserve(base: f64, mutated: f64) -> f64 {
    base + (mutated - base) * PRESERVE_RATIO
}

/// Optional variances only count when positive.
fn set_variance(variance: Option<f64>) -> Option<f64> {
    variance.filter(|v| *v > 0.0).map(|v| v / 100.0)
}

// ── Generator ───────────────────────────────────────────────

/// Produces variants of one base sound under one variation profile.
pub struct VariationGenerator<'a, R> {
    base: &'a SoundParameters,
    config: &'a VariationParameters,
    rng: R,
}

impl<'a> VariationGenerator<'a, SmallRng> {
    /// Generator driven by a `SmallRng` seeded with `seed`.
    pub fn seeded(
        base: &'a SoundParameters,
        config: &'a VariationParameters,
        seed: u64,
    ) -> Self {
        Self::new(base, config, SmallRng::seed_from_u64(seed))
    }
}

impl<'a, R: Rng> VariationGenerator<'a, R> {
    pub fn new(base: &'a SoundParameters, config: &'a VariationParameters, rng: R) -> Self {
        VariationGenerator { base, config, rng }
    }

    /// Produce one variant.
    ///
    /// Draw order: duration, frequency, envelope, type-specific field, effects.
    pub fn generate_variation(&mut self) -> SoundParameters {
        let base = self.base;
        let config = self.config;
        let mut variant = base.clone();

        if config.duration_variance > 0.0 {
            let factor = bias_factor(
                &mut self.rng,
                config.duration_variance / 100.0,
                config.duration_bias.direction(),
            );
            variant.duration = bounds::DURATION.clamp(base.duration * factor);
        }

        if config.frequency_variance > 0.0 {
            let factor = bias_factor(
                &mut self.rng,
                config.frequency_variance / 100.0,
                config.frequency_bias.direction(),
            );
            variant.frequency = bounds::FREQUENCY.clamp(base.frequency * factor);
        }

        self.vary_voice(&mut variant.voice);

        if config.effect_probability > 0.0 {
            if let Some(effects) = variant.effects.as_mut() {
                for enabled in effects.values_mut() {
                    let roll: f64 = self.rng.gen_range(0.0..100.0);
                    if roll < config.effect_probability {
                        *enabled = !*enabled;
                    }
                }
            }
        }

        // Only duration and frequency are pulled back; envelope and
        // type-specific fields keep their full mutation. The second clamp
        // covers bases that sit outside the bounds themselves.
        if config.preserve_character {
            variant.duration =
                bounds::DURATION.clamp(preserve(base.duration, variant.duration));
            variant.frequency =
                bounds::FREQUENCY.clamp(preserve(base.frequency, variant.frequency));
        }

        variant
    }

    /// Produce `count` independent variants, in draw order.
    pub fn generate_batch(&mut self, count: usize) -> Vec<SoundParameters> {
        debug!(
            count,
            sound_type = self.base.sound_type().as_str(),
            "generating variation batch"
        );
        (0..count).map(|_| self.generate_variation()).collect()
    }

    fn vary_voice(&mut self, voice: &mut Voice) {
        let config = self.config;
        let rng = &mut self.rng;

        match voice {
            Voice::Tone {
                attack,
                decay,
                sustain,
                release,
            } => {
                if config.envelope_variance <= 0.0 {
                    return;
                }
                let variance = config.envelope_variance / 100.0;
                let fields = [
                    (attack, bounds::ATTACK),
                    (decay, bounds::DECAY),
                    (sustain, bounds::SUSTAIN),
                    (release, bounds::RELEASE),
                ];
                for (field, b) in fields {
                    if let Some(value) = field.as_mut() {
                        *value = vary_bounded(rng, *value, variance, b);
                    }
                }
            }
            Voice::Chime { harmonics } => {
                if let (Some(variance), Some(count)) =
                    (set_variance(config.harmonic_variance), harmonics.as_mut())
                {
                    let varied = vary_bounded(rng, *count as f64, variance, bounds::HARMONICS);
                    *count = varied.round() as u32;
                }
            }
            Voice::Pulse { pulse_rate } => {
                if let (Some(variance), Some(rate)) =
                    (set_variance(config.pulse_rate_variance), pulse_rate.as_mut())
                {
                    *rate = vary_bounded(rng, *rate, variance, bounds::PULSE_RATE);
                }
            }
            Voice::Sweep { sweep_range } => {
                if let (Some(variance), Some(range)) =
                    (set_variance(config.sweep_range_variance), sweep_range.as_mut())
                {
                    *range = vary_bounded(rng, *range, variance, bounds::SWEEP_RANGE);
                }
            }
            Voice::Click => {}
        }
    }
}
