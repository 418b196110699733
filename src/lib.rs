pub mod dsp;
pub mod error;
pub mod sound;
#[cfg(feature = "store")]
pub mod store;
pub mod variation;

use crate::error::SfxError;
use crate::sound::SoundParameters;
use crate::variation::{VariationGenerator, VariationParameters, VariationPreset};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// The crate version, read from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generate `count` variants of `base` under `config`, drawing from a
/// `SmallRng` seeded with `seed`.
///
/// Both inputs are validated first, so every variant's frequency and
/// duration stay inside `variation::bounds`. The same inputs and seed always
/// give the same batch. Negative counts yield an empty batch.
pub fn generate_variations_seeded(
    base: &SoundParameters,
    config: &VariationParameters,
    count: i64,
    seed: u64,
) -> Result<Vec<SoundParameters>, SfxError> {
    base.validate()?;
    config.validate()?;
    let count = usize::try_from(count).unwrap_or(0);
    Ok(VariationGenerator::seeded(base, config, seed).generate_batch(count))
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&format!("{e}"))
}

// json_compatible: maps become plain objects, so `effects.reverb` works in JS.
fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(js_err)
}

/// WASM-exposed: return the sfx-core version string.
#[wasm_bindgen]
pub fn core_version() -> String {
    VERSION.to_string()
}

/// WASM-exposed: `{ name: VariationParameters }` for every built-in preset.
#[wasm_bindgen]
pub fn variation_presets() -> Result<JsValue, JsValue> {
    let presets: std::collections::BTreeMap<&str, VariationParameters> = VariationPreset::ALL
        .iter()
        .map(|p| (p.name(), p.params()))
        .collect();
    to_js(&presets)
}

/// WASM-exposed: look up one preset by name.
#[wasm_bindgen]
pub fn variation_preset(name: &str) -> Result<JsValue, JsValue> {
    let preset: VariationPreset = name.parse().map_err(js_err)?;
    to_js(&preset.params())
}

/// WASM-exposed: generate a batch of variant parameter sets.
#[wasm_bindgen]
pub fn generate_variations(
    base: JsValue,
    config: JsValue,
    count: i32,
    seed: u64,
) -> Result<JsValue, JsValue> {
    let base: SoundParameters = serde_wasm_bindgen::from_value(base).map_err(js_err)?;
    let config: VariationParameters = serde_wasm_bindgen::from_value(config).map_err(js_err)?;
    let variants =
        generate_variations_seeded(&base, &config, count as i64, seed).map_err(js_err)?;
    to_js(&variants)
}

/// WASM-exposed: render a sound to a WAV byte array.
#[wasm_bindgen]
pub fn render_sound_wav(params: JsValue, sample_rate: u32) -> Result<Vec<u8>, JsValue> {
    let params: SoundParameters = serde_wasm_bindgen::from_value(params).map_err(js_err)?;
    dsp::renderer::render_wav(&params, sample_rate).map_err(js_err)
}

/// WASM-exposed: render a sound to mono f32 samples for AudioBuffer playback.
#[wasm_bindgen]
pub fn render_sound_samples(params: JsValue, sample_rate: u32) -> Result<Vec<f32>, JsValue> {
    let params: SoundParameters = serde_wasm_bindgen::from_value(params).map_err(js_err)?;
    dsp::renderer::render_samples(&params, sample_rate).map_err(js_err)
}
