//! Variation profile — how aggressively a batch of variants departs from its base.

use serde::{Deserialize, Serialize};

use crate::error::{InvalidField, SfxError};

/// Largest variance percentage accepted by `validate`.
pub const MAX_VARIANCE: f64 = 50.0;
/// Largest probability percentage accepted by `validate`.
pub const MAX_PROBABILITY: f64 = 100.0;

/// Direction a biased mutation factor may move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Down,
    Up,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DurationBias {
    Shorter,
    Longer,
    #[default]
    Balanced,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrequencyBias {
    Lower,
    Higher,
    #[default]
    Balanced,
}

impl DurationBias {
    pub fn direction(self) -> Direction {
        match self {
            DurationBias::Shorter => Direction::Down,
            DurationBias::Longer => Direction::Up,
            DurationBias::Balanced => Direction::Both,
        }
    }
}

impl FrequencyBias {
    pub fn direction(self) -> Direction {
        match self {
            FrequencyBias::Lower => Direction::Down,
            FrequencyBias::Higher => Direction::Up,
            FrequencyBias::Balanced => Direction::Both,
        }
    }
}

/// Per-batch mutation profile. Variances are percentages of the base value,
/// probabilities are percentages per draw.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariationParameters {
    pub duration_variance: f64,
    pub duration_bias: DurationBias,
    pub frequency_variance: f64,
    pub frequency_bias: FrequencyBias,
    pub envelope_variance: f64,
    /// Chance each effect flag is flipped.
    pub effect_probability: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub harmonic_variance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pulse_rate_variance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep_range_variance: Option<f64>,
    /// Pull duration and frequency halfway back toward the base.
    pub preserve_character: bool,
}

impl VariationParameters {
    /// Reject profiles outside the documented ranges.
    ///
    /// Callers run this at their boundary; the generator accepts anything and
    /// only clamps its outputs.
    pub fn validate(&self) -> Result<(), SfxError> {
        let variances = [
            ("durationVariance", Some(self.duration_variance)),
            ("frequencyVariance", Some(self.frequency_variance)),
            ("envelopeVariance", Some(self.envelope_variance)),
            ("harmonicVariance", self.harmonic_variance),
            ("pulseRateVariance", self.pulse_rate_variance),
            ("sweepRangeVariance", self.sweep_range_variance),
        ];
        for (field, value) in variances {
            if let Some(v) = value {
                check_percent(field, v, MAX_VARIANCE, "a percentage in 0..=50")?;
            }
        }
        check_percent(
            "effectProbability",
            self.effect_probability,
            MAX_PROBABILITY,
            "a percentage in 0..=100",
        )
    }
}

fn check_percent(
    field: &'static str,
    value: f64,
    max: f64,
    expected: &'static str,
) -> Result<(), SfxError> {
    if value.is_finite() && (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(SfxError::InvalidVariation(InvalidField::new(
            field, value, expected,
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default() {
        let params: VariationParameters =
            serde_json::from_str(r#"{"durationVariance": 20}"#).unwrap();
        assert_eq!(params.duration_variance, 20.0);
        assert_eq!(params.duration_bias, DurationBias::Balanced);
        assert_eq!(params.frequency_bias, FrequencyBias::Balanced);
        assert_eq!(params.effect_probability, 0.0);
        assert!(params.harmonic_variance.is_none());
        assert!(!params.preserve_character);
    }

    #[test]
    fn parses_bias_names() {
        let params: VariationParameters = serde_json::from_str(
            r#"{"durationBias": "shorter", "frequencyBias": "higher", "preserveCharacter": true}"#,
        )
        .unwrap();
        assert_eq!(params.duration_bias.direction(), Direction::Down);
        assert_eq!(params.frequency_bias.direction(), Direction::Up);
        assert!(params.preserve_character);
    }

    #[test]
    fn duration_bias_rejects_frequency_words() {
        let result = serde_json::from_str::<VariationParameters>(r#"{"durationBias": "higher"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn validate_ranges() {
        let mut params = VariationParameters {
            duration_variance: 50.0,
            effect_probability: 100.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());

        params.duration_variance = -1.0;
        assert!(params.validate().is_err());

        params.duration_variance = 10.0;
        params.pulse_rate_variance = Some(60.0);
        assert!(params.validate().is_err());

        params.pulse_rate_variance = None;
        params.effect_probability = 101.0;
        assert!(params.validate().is_err());

        params.effect_probability = f64::NAN;
        assert!(params.validate().is_err());
    }
}
