//! Named variation profiles offered in the batch-generation UI.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::config::{DurationBias, FrequencyBias, VariationParameters};
use crate::error::SfxError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VariationPreset {
    Subtle,
    Moderate,
    Wild,
    ShorterVariants,
    LongerVariants,
}

impl VariationPreset {
    pub const ALL: [VariationPreset; 5] = [
        VariationPreset::Subtle,
        VariationPreset::Moderate,
        VariationPreset::Wild,
        VariationPreset::ShorterVariants,
        VariationPreset::LongerVariants,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            VariationPreset::Subtle => "subtle",
            VariationPreset::Moderate => "moderate",
            VariationPreset::Wild => "wild",
            VariationPreset::ShorterVariants => "shorterVariants",
            VariationPreset::LongerVariants => "longerVariants",
        }
    }

    /// The profile this preset stands for.
    pub fn params(&self) -> VariationParameters {
        use DurationBias as D;
        use FrequencyBias as F;

        // (duration%, duration bias, frequency%, frequency bias, envelope%, effect%, preserve)
        let (dv, db, fv, fb, ev, ep, preserve) = match self {
            VariationPreset::Subtle => (10.0, D::Balanced, 5.0, F::Balanced, 10.0, 0.0, true),
            VariationPreset::Moderate => (25.0, D::Balanced, 15.0, F::Balanced, 20.0, 20.0, true),
            VariationPreset::Wild => (50.0, D::Balanced, 40.0, F::Balanced, 40.0, 50.0, false),
            VariationPreset::ShorterVariants => (30.0, D::Shorter, 10.0, F::Higher, 15.0, 10.0, true),
            VariationPreset::LongerVariants => (30.0, D::Longer, 10.0, F::Lower, 15.0, 10.0, true),
        };

        VariationParameters {
            duration_variance: dv,
            duration_bias: db,
            frequency_variance: fv,
            frequency_bias: fb,
            envelope_variance: ev,
            effect_probability: ep,
            harmonic_variance: None,
            pulse_rate_variance: None,
            sweep_range_variance: None,
            preserve_character: preserve,
        }
    }
}

impl fmt::Display for VariationPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VariationPreset {
    type Err = SfxError;

    /// Accepts `shorterVariants`, `shorter-variants` and `shorter_variants`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        VariationPreset::ALL
            .into_iter()
            .find(|p| p.name().to_ascii_lowercase() == key)
            .ok_or_else(|| SfxError::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_table_values() {
        let subtle = VariationPreset::Subtle.params();
        assert_eq!(subtle.duration_variance, 10.0);
        assert_eq!(subtle.frequency_variance, 5.0);
        assert_eq!(subtle.envelope_variance, 10.0);
        assert_eq!(subtle.effect_probability, 0.0);
        assert!(subtle.preserve_character);

        let moderate = VariationPreset::Moderate.params();
        assert_eq!(moderate.duration_variance, 25.0);
        assert_eq!(moderate.frequency_variance, 15.0);
        assert_eq!(moderate.envelope_variance, 20.0);
        assert_eq!(moderate.effect_probability, 20.0);
        assert!(moderate.preserve_character);

        let wild = VariationPreset::Wild.params();
        assert_eq!(wild.duration_variance, 50.0);
        assert_eq!(wild.frequency_variance, 40.0);
        assert_eq!(wild.envelope_variance, 40.0);
        assert_eq!(wild.effect_probability, 50.0);
        assert!(!wild.preserve_character);

        let shorter = VariationPreset::ShorterVariants.params();
        assert_eq!(shorter.duration_variance, 30.0);
        assert_eq!(shorter.duration_bias, DurationBias::Shorter);
        assert_eq!(shorter.frequency_variance, 10.0);
        assert_eq!(shorter.frequency_bias, FrequencyBias::Higher);
        assert_eq!(shorter.envelope_variance, 15.0);
        assert_eq!(shorter.effect_probability, 10.0);
        assert!(shorter.preserve_character);

        let longer = VariationPreset::LongerVariants.params();
        assert_eq!(longer.duration_bias, DurationBias::Longer);
        assert_eq!(longer.frequency_bias, FrequencyBias::Lower);
        assert_eq!(longer.duration_variance, 30.0);
        assert_eq!(longer.effect_probability, 10.0);
    }

    #[test]
    fn all_presets_validate() {
        for preset in VariationPreset::ALL {
            assert!(preset.params().validate().is_ok(), "{preset} should validate");
        }
    }

    #[test]
    fn parse_names() {
        assert_eq!("wild".parse::<VariationPreset>().unwrap(), VariationPreset::Wild);
        assert_eq!(
            "shorter-variants".parse::<VariationPreset>().unwrap(),
            VariationPreset::ShorterVariants
        );
        assert_eq!(
            "longer_variants".parse::<VariationPreset>().unwrap(),
            VariationPreset::LongerVariants
        );
        assert_eq!(
            "longerVariants".parse::<VariationPreset>().unwrap(),
            VariationPreset::LongerVariants
        );
        assert!("chaotic".parse::<VariationPreset>().is_err());
    }

    #[test]
    fn serde_name_matches_display() {
        for preset in VariationPreset::ALL {
            let json = serde_json::to_string(&preset).unwrap();
            assert_eq!(json, format!("\"{preset}\""));
        }
    }
}
