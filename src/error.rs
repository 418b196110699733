use std::fmt;

#[derive(Debug)]
pub enum SfxError {
    Json(serde_json::Error),
    Io(std::io::Error),
    InvalidSound(InvalidField),
    InvalidVariation(InvalidField),
    UnknownPreset(String),
    NotFound(String),
    InvalidId(String),
    UnsupportedSampleRate(u32),
}

/// A numeric field that failed a boundary check.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidField {
    pub field: &'static str,
    pub value: f64,
    pub expected: &'static str,
}

impl InvalidField {
    pub fn new(field: &'static str, value: f64, expected: &'static str) -> Self {
        InvalidField {
            field,
            value,
            expected,
        }
    }
}

impl fmt::Display for SfxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SfxError::Json(e) => write!(f, "JSON error: {e}"),
            SfxError::Io(e) => write!(f, "I/O error: {e}"),
            SfxError::InvalidSound(e) => write!(f, "Invalid sound parameters: {e}"),
            SfxError::InvalidVariation(e) => write!(f, "Invalid variation parameters: {e}"),
            SfxError::UnknownPreset(name) => write!(f, "Unknown variation preset '{name}'"),
            SfxError::NotFound(id) => write!(f, "Sound '{id}' not found"),
            SfxError::InvalidId(id) => write!(f, "Invalid sound id '{id}'"),
            SfxError::UnsupportedSampleRate(rate) => write!(f, "Unsupported sample rate {rate} Hz"),
        }
    }
}

impl fmt::Display for InvalidField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} = {} (expected {})",
            self.field, self.value, self.expected
        )
    }
}

impl std::error::Error for SfxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SfxError::Json(e) => Some(e),
            SfxError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for SfxError {
    fn from(e: serde_json::Error) -> Self {
        SfxError::Json(e)
    }
}

impl From<std::io::Error> for SfxError {
    fn from(e: std::io::Error) -> Self {
        SfxError::Io(e)
    }
}
