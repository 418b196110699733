//! Preview synthesis — renders sound parameters to audio.
//!
//! Deterministic offline rendering shared by the web app (through WASM) and
//! the CLI's WAV export.

pub mod delay;
pub mod effects;
pub mod envelope;
pub mod filter;
pub mod oscillator;
pub mod renderer;
pub mod reverb;
pub mod voice;
