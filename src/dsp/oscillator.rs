//! Phase-accumulator oscillators with PolyBLEP anti-aliasing.

use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Waveform {
    Sine,
    Square,
}

/// A band-limited oscillator. `frequency` may be changed between samples
/// for glides; phase stays continuous.
#[derive(Debug, Clone)]
pub struct Oscillator {
    pub waveform: Waveform,
    pub frequency: f64,
    phase: f64,
    sample_rate: f64,
}

impl Oscillator {
    pub fn new(waveform: Waveform, frequency: f64, sample_rate: f64) -> Self {
        Oscillator {
            waveform,
            frequency,
            phase: 0.0,
            sample_rate,
        }
    }

    /// Phase increment per sample, kept below Nyquist.
    fn phase_inc(&self) -> f64 {
        (self.frequency / self.sample_rate).clamp(0.0, 0.5)
    }

    pub fn next_sample(&mut self) -> f64 {
        let inc = self.phase_inc();
        let sample = match self.waveform {
            Waveform::Sine => (2.0 * PI * self.phase).sin(),
            Waveform::Square => {
                let mut value = if self.phase < 0.5 { 1.0 } else { -1.0 };
                value += poly_blep(self.phase, inc);
                value -= poly_blep((self.phase + 0.5) % 1.0, inc);
                value
            }
        };

        self.phase += inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        sample
    }
}

/// PolyBLEP correction around a discontinuity at phase 0.
///
/// `t` is the phase [0, 1), `dt` the phase increment per sample.
fn poly_blep(t: f64, dt: f64) -> f64 {
    if dt <= 0.0 {
        0.0
    } else if t < dt {
        let t = t / dt;
        2.0 * t - t * t - 1.0
    } else if t > 1.0 - dt {
        let t = (t - 1.0) / dt;
        t * t + 2.0 * t + 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_starts_at_zero() {
        let mut osc = Oscillator::new(Waveform::Sine, 440.0, 44100.0);
        let s = osc.next_sample();
        assert!(s.abs() < 1e-10, "Sine should start near 0, got {s}");
    }

    #[test]
    fn waveforms_bounded() {
        for waveform in [Waveform::Sine, Waveform::Square] {
            let mut osc = Oscillator::new(waveform, 1000.0, 44100.0);
            for _ in 0..44100 {
                let s = osc.next_sample();
                assert!(s.is_finite() && s.abs() <= 1.5, "{waveform:?} out of range: {s}");
            }
        }
    }

    #[test]
    fn frequency_change_keeps_phase() {
        let mut osc = Oscillator::new(Waveform::Sine, 100.0, 1000.0);
        for _ in 0..3 {
            osc.next_sample();
        }
        let before = osc.phase;
        osc.frequency = 200.0;
        osc.next_sample();
        assert!((osc.phase - (before + 0.2)).abs() < 1e-12);
    }

    #[test]
    fn above_nyquist_is_clamped() {
        let osc = Oscillator::new(Waveform::Sine, 30000.0, 44100.0);
        assert_eq!(osc.phase_inc(), 0.5);
    }
}
