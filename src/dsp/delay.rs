//! Echo — mono feedback delay line.

#[derive(Debug, Clone)]
pub struct Delay {
    buffer: Vec<f32>,
    write_pos: usize,
    delay_samples: usize,
    /// Feedback amount, kept below 1.0.
    feedback: f32,
    /// Dry/wet mix (0.0 = fully dry, 1.0 = fully wet).
    mix: f32,
}

impl Delay {
    pub fn new(sample_rate: f64, delay_time: f64, feedback: f64, mix: f64) -> Self {
        let delay_samples = ((delay_time * sample_rate) as usize).max(1);
        Delay {
            buffer: vec![0.0; delay_samples],
            write_pos: 0,
            delay_samples,
            feedback: feedback.clamp(0.0, 0.95) as f32,
            mix: mix.clamp(0.0, 1.0) as f32,
        }
    }

    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        // The ring buffer is exactly one delay long, so the slot about to be
        // overwritten holds the sample from `delay_samples` ago.
        let delayed = self.buffer[self.write_pos];
        self.buffer[self.write_pos] = input + delayed * self.feedback;
        self.write_pos = (self.write_pos + 1) % self.delay_samples;
        input * (1.0 - self.mix) + delayed * self.mix
    }

    pub fn process_block(&mut self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            *sample = self.process(*sample);
        }
    }
}
