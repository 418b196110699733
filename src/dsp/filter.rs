//! Biquad filter (Audio EQ Cookbook coefficients, Direct Form II Transposed).

use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FilterType {
    Lowpass,
    Bandpass,
}

#[derive(Debug, Clone)]
pub struct BiquadFilter {
    b0: f64,
    b1: f64,
    b2: f64,
    a1: f64,
    a2: f64,
    z1: f64,
    z2: f64,
}

impl BiquadFilter {
    /// `frequency` is clamped below Nyquist so coefficients stay stable.
    /// The Nyquist cap wins over the 10 Hz floor at very low sample rates.
    pub fn new(filter_type: FilterType, frequency: f64, q: f64, sample_rate: f64) -> Self {
        let frequency = frequency.max(10.0).min(sample_rate * 0.49);
        let w0 = 2.0 * PI * frequency / sample_rate;
        let cos_w0 = w0.cos();
        let alpha = w0.sin() / (2.0 * q.max(0.01));

        let (b0, b1, b2) = match filter_type {
            FilterType::Lowpass => {
                let b1 = 1.0 - cos_w0;
                (b1 / 2.0, b1, b1 / 2.0)
            }
            FilterType::Bandpass => (alpha, 0.0, -alpha),
        };
        let a0 = 1.0 + alpha;

        BiquadFilter {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: -2.0 * cos_w0 / a0,
            a2: (1.0 - alpha) / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    pub fn process(&mut self, input: f64) -> f64 {
        let output = self.b0 * input + self.z1;
        self.z1 = self.b1 * input - self.a1 * output + self.z2;
        self.z2 = self.b2 * input - self.a2 * output;
        output
    }

    /// Filter a buffer in place.
    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample as f64) as f32;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowpass_passes_dc() {
        let mut f = BiquadFilter::new(FilterType::Lowpass, 5000.0, 0.707, 44100.0);
        let mut output = 0.0;
        for _ in 0..1000 {
            output = f.process(1.0);
        }
        assert!((output - 1.0).abs() < 0.001, "Lowpass should pass DC, got {output}");
    }

    #[test]
    fn bandpass_blocks_dc() {
        let mut f = BiquadFilter::new(FilterType::Bandpass, 1000.0, 1.5, 44100.0);
        let mut output = 1.0;
        for _ in 0..5000 {
            output = f.process(1.0);
        }
        assert!(output.abs() < 0.001, "Bandpass should block DC, got {output}");
    }

    #[test]
    fn lowpass_attenuates_high_freq() {
        let mut f = BiquadFilter::new(FilterType::Lowpass, 200.0, 0.707, 44100.0);
        let mut max_out = 0.0_f64;
        for i in 0..4410 {
            let t = i as f64 / 44100.0;
            let out = f.process((2.0 * PI * 10000.0 * t).sin());
            if i > 1000 {
                max_out = max_out.max(out.abs());
            }
        }
        assert!(max_out < 0.01, "Lowpass@200Hz should attenuate 10kHz, got {max_out}");
    }

    #[test]
    fn cutoff_above_nyquist_stays_finite() {
        let mut f = BiquadFilter::new(FilterType::Bandpass, 40000.0, 0.707, 44100.0);
        let mut buffer = vec![0.0f32; 1000];
        buffer[0] = 1.0;
        f.process_block(&mut buffer);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn tiny_sample_rate_does_not_panic() {
        for sr in [1.0, 16.0, 20.0] {
            let mut f = BiquadFilter::new(FilterType::Bandpass, 2000.0, 1.5, sr);
            let mut buffer = vec![0.5f32; 64];
            f.process_block(&mut buffer);
            assert!(buffer.iter().all(|s| s.is_finite()), "sr {sr}");
        }
    }
}
