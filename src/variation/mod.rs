//! Variation system — parametric mutation of a base sound into related variants.

pub mod config;
pub use config::*;
pub mod presets;
pub use presets::*;
pub mod generator;
pub use generator::*;
