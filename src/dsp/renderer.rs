//! Renderer — turns `SoundParameters` into samples or a WAV byte buffer.

use tracing::debug;

use super::effects::apply_effects;
use super::voice::synthesize;
use crate::error::SfxError;
use crate::sound::SoundParameters;

/// Peak level after normalisation.
const TARGET_PEAK: f32 = 0.9;
/// Fade applied at both edges to avoid clicks at buffer boundaries.
const EDGE_FADE_SECONDS: f64 = 0.005;
/// Accepted output sample rates, in Hz.
pub const MIN_SAMPLE_RATE: u32 = 8_000;
pub const MAX_SAMPLE_RATE: u32 = 192_000;

/// Render a sound to mono f32 samples in [-1, 1].
///
/// `params` is validated first, so the buffer length is bounded by the
/// longest allowed duration at the highest allowed rate.
pub fn render_samples(params: &SoundParameters, sample_rate: u32) -> Result<Vec<f32>, SfxError> {
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&sample_rate) {
        return Err(SfxError::UnsupportedSampleRate(sample_rate));
    }
    params.validate()?;

    let sr = sample_rate as f64;
    let mut buffer = synthesize(params, sr);
    apply_effects(&mut buffer, params, sr);
    fade_edges(&mut buffer, (EDGE_FADE_SECONDS * sr) as usize);
    normalize(&mut buffer, TARGET_PEAK);

    debug!(
        sound_type = params.sound_type().as_str(),
        samples = buffer.len(),
        sample_rate,
        "rendered sound"
    );
    Ok(buffer)
}

/// Render a sound to a WAV file as bytes (16-bit mono PCM).
pub fn render_wav(params: &SoundParameters, sample_rate: u32) -> Result<Vec<u8>, SfxError> {
    let pcm: Vec<i16> = render_samples(params, sample_rate)?
        .iter()
        .map(|&s| (s as f64 * 32767.0).round().clamp(-32768.0, 32767.0) as i16)
        .collect();
    Ok(encode_wav(&pcm, sample_rate, 1))
}

/// Scale so the loudest sample sits at `target`. Silence is left alone.
fn normalize(buffer: &mut [f32], target: f32) {
    let peak = buffer.iter().fold(0.0f32, |m, s| m.max(s.abs()));
    if peak > f32::EPSILON {
        let gain = target / peak;
        for sample in buffer.iter_mut() {
            *sample *= gain;
        }
    }
}

/// Linear fade-in and fade-out over `fade_len` samples each.
fn fade_edges(buffer: &mut [f32], fade_len: usize) {
    let fade_len = fade_len.min(buffer.len() / 2);
    if fade_len == 0 {
        return;
    }
    let len = buffer.len();
    for i in 0..fade_len {
        let gain = i as f32 / fade_len as f32;
        buffer[i] *= gain;
        buffer[len - 1 - i] *= gain;
    }
}

/// Encode interleaved i16 PCM samples to a WAV byte buffer.
pub fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> Vec<u8> {
    let bits_per_sample: u16 = 16;
    let byte_rate = sample_rate * channels as u32 * (bits_per_sample as u32 / 8);
    let block_align = channels * (bits_per_sample / 8);
    let data_size = (samples.len() * 2) as u32;
    let file_size = 36 + data_size;

    let mut buf = Vec::with_capacity(44 + data_size as usize);

    // RIFF header
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&file_size.to_le_bytes());
    buf.extend_from_slice(b"WAVE");

    // fmt chunk
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&byte_rate.to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&bits_per_sample.to_le_bytes());

    // data chunk
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &sample in samples {
        buf.extend_from_slice(&sample.to_le_bytes());
    }

    buf
}
