//! Reverb — mono Schroeder/Freeverb: parallel damped combs into series allpasses.

#[derive(Debug, Clone)]
struct Comb {
    buffer: Vec<f32>,
    index: usize,
    feedback: f32,
    damp: f32,
    store: f32,
}

impl Comb {
    fn new(size: usize, feedback: f32, damp: f32) -> Self {
        Comb {
            buffer: vec![0.0; size.max(1)],
            index: 0,
            feedback,
            damp,
            store: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let output = self.buffer[self.index];
        // One-pole lowpass in the feedback path
        self.store = output * (1.0 - self.damp) + self.store * self.damp;
        self.buffer[self.index] = input + self.store * self.feedback;
        self.index = (self.index + 1) % self.buffer.len();
        output
    }
}

#[derive(Debug, Clone)]
struct Allpass {
    buffer: Vec<f32>,
    index: usize,
}

impl Allpass {
    fn new(size: usize) -> Self {
        Allpass {
            buffer: vec![0.0; size.max(1)],
            index: 0,
        }
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let buffered = self.buffer[self.index];
        self.buffer[self.index] = input + buffered * 0.5;
        self.index = (self.index + 1) % self.buffer.len();
        buffered - input
    }
}

// Freeverb tunings at 44.1 kHz
const COMB_TUNING: [usize; 8] = [1116, 1188, 1277, 1356, 1422, 1491, 1557, 1617];
const ALLPASS_TUNING: [usize; 4] = [556, 441, 341, 225];
const INPUT_GAIN: f32 = 0.015;

#[derive(Debug, Clone)]
pub struct Reverb {
    combs: Vec<Comb>,
    allpasses: Vec<Allpass>,
    mix: f32,
}

impl Reverb {
    /// `room_size` and `damping` in [0, 1].
    pub fn new(sample_rate: f64, room_size: f64, damping: f64, mix: f64) -> Self {
        let scale = sample_rate / 44100.0;
        let feedback = (room_size.clamp(0.0, 1.0) * 0.28 + 0.7) as f32;
        let damp = damping.clamp(0.0, 1.0) as f32;

        Reverb {
            combs: COMB_TUNING
                .iter()
                .map(|&t| Comb::new((t as f64 * scale) as usize, feedback, damp))
                .collect(),
            allpasses: ALLPASS_TUNING
                .iter()
                .map(|&t| Allpass::new((t as f64 * scale) as usize))
                .collect(),
            mix: mix.clamp(0.0, 1.0) as f32,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let scaled = input * INPUT_GAIN;
        let mut wet: f32 = self.combs.iter_mut().map(|c| c.process(scaled)).sum();
        for allpass in &mut self.allpasses {
            wet = allpass.process(wet);
        }
        input * (1.0 - self.mix) + wet * self.mix
    }

    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dry_mix_is_identity() {
        let mut reverb = Reverb::new(44100.0, 0.5, 0.5, 0.0);
        for i in 0..100 {
            let x = (i as f32 * 0.1).sin();
            assert!((reverb.process(x) - x).abs() < 1e-6);
        }
    }

    #[test]
    fn impulse_produces_tail() {
        let mut reverb = Reverb::new(44100.0, 0.8, 0.2, 1.0);
        let mut buffer = vec![0.0f32; 44100];
        buffer[0] = 1.0;
        reverb.process_block(&mut buffer);

        let tail_energy: f32 = buffer[2000..].iter().map(|s| s * s).sum();
        assert!(tail_energy > 0.0, "Reverb should ring after the impulse");
        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn low_sample_rate_still_builds() {
        let mut reverb = Reverb::new(8000.0, 0.5, 0.5, 0.5);
        assert!(reverb.process(1.0).is_finite());
    }
}
