//! Amplitude envelopes evaluated against a known sound length.
//!
//! UI sounds are rendered offline with a fixed duration, so the envelope is a
//! pure function of time instead of a gated state machine.

/// Linear ADSR. The release starts `release` seconds before the end of the
/// sound so the tail always fits inside the rendered duration. Releases
/// longer than half the sound are shortened to half.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Adsr {
    /// Attack time in seconds.
    pub attack: f64,
    /// Decay time in seconds.
    pub decay: f64,
    /// Sustain level [0, 1].
    pub sustain: f64,
    /// Release time in seconds.
    pub release: f64,
}

impl Default for Adsr {
    fn default() -> Self {
        Adsr {
            attack: 0.01,
            decay: 0.05,
            sustain: 0.5,
            release: 0.1,
        }
    }
}

impl Adsr {
    /// Envelope level [0, 1] at time `t` of a sound lasting `duration` seconds.
    pub fn level_at(&self, t: f64, duration: f64) -> f64 {
        if t < 0.0 || t >= duration {
            return 0.0;
        }

        let release = self.release.min(duration * 0.5);
        let release_start = duration - release;
        let held = self.held_level(t.min(release_start));

        if t < release_start {
            held
        } else if release <= 0.0 {
            0.0
        } else {
            let progress = ((t - release_start) / release).min(1.0);
            held * (1.0 - progress)
        }
    }

    /// Level before note-off: attack ramp, decay ramp, then sustain.
    fn held_level(&self, t: f64) -> f64 {
        if t < self.attack {
            t / self.attack
        } else if t < self.attack + self.decay {
            let progress = (t - self.attack) / self.decay;
            1.0 - (1.0 - self.sustain) * progress
        } else {
            self.sustain
        }
    }
}

/// Exponential decay `e^(-t / tau)`.
pub fn exp_decay(t: f64, tau: f64) -> f64 {
    if tau <= 0.0 { 0.0 } else { (-t / tau).exp() }
}
