//! Requirement tables
//!
//! Pure lookups from age (and optionally weight) to daily intake targets and
//! growth benchmarks. Bands are keyed by their lower bound; an age selects
//! the last band whose lower bound it has reached, so every non-negative age
//! resolves to some band.

use serde::Serialize;

use super::config::{EvaluationConfig, ExpectedWeightBand, GrowthBand, RequirementBand};

/// Daily intake targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Requirement {
    pub calorie_kcal_per_day: f64,
    pub protein_g_per_day: f64,
}

fn requirement_band(config: &EvaluationConfig, age_months: u32) -> &RequirementBand {
    config
        .requirement_bands
        .iter()
        .rev()
        .find(|band| band.min_months <= age_months)
        .unwrap_or(&config.requirement_bands[0])
}

/// Expected daily calories for an age
pub fn calorie_requirement(config: &EvaluationConfig, age_months: u32) -> f64 {
    requirement_band(config, age_months).calorie_kcal
}

/// Expected daily protein; weight-based when a weight is known
pub fn protein_requirement(
    config: &EvaluationConfig,
    age_months: u32,
    weight_kg: Option<f64>,
) -> f64 {
    match weight_kg {
        Some(kg) if kg.is_finite() && kg > 0.0 => kg * config.protein_g_per_kg,
        _ => requirement_band(config, age_months).protein_g,
    }
}

/// Both daily targets
pub fn requirement_for(
    config: &EvaluationConfig,
    age_months: u32,
    weight_kg: Option<f64>,
) -> Requirement {
    Requirement {
        calorie_kcal_per_day: calorie_requirement(config, age_months),
        protein_g_per_day: protein_requirement(config, age_months, weight_kg),
    }
}

/// Expected monthly weight and height gain for an age
pub fn expected_monthly_gain(config: &EvaluationConfig, age_months: u32) -> &GrowthBand {
    config
        .growth_bands
        .iter()
        .rev()
        .find(|band| band.min_months <= age_months)
        .unwrap_or(&config.growth_bands[0])
}

fn expected_weight_band(config: &EvaluationConfig, age_months: u32) -> &ExpectedWeightBand {
    config
        .expected_weight_bands
        .iter()
        .rev()
        .find(|band| band.min_months <= age_months)
        .unwrap_or(&config.expected_weight_bands[0])
}

/// Rough weight-for-age estimate in kg
pub fn expected_weight_kg(config: &EvaluationConfig, age_months: u32) -> f64 {
    let band = expected_weight_band(config, age_months);
    band.base_kg + band.kg_per_year * f64::from(age_months) / 12.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calorie_bands() {
        let config = EvaluationConfig::default();
        assert_eq!(calorie_requirement(&config, 0), 450.0);
        assert_eq!(calorie_requirement(&config, 11), 500.0);
        assert_eq!(calorie_requirement(&config, 24), 1200.0);
        assert_eq!(calorie_requirement(&config, 35), 1200.0);
        assert_eq!(calorie_requirement(&config, 59), 1400.0);
        assert_eq!(calorie_requirement(&config, 400), 2000.0);
    }

    #[test]
    fn test_requirements_monotonic_and_constant_within_band() {
        let config = EvaluationConfig::default();
        let mut previous = (0.0, 0.0);
        for age in 0..=240 {
            let kcal = calorie_requirement(&config, age);
            let protein = protein_requirement(&config, age, None);
            assert!(kcal >= previous.0, "calories dropped at {} months", age);
            assert!(protein >= previous.1, "protein dropped at {} months", age);
            assert!(kcal > 0.0 && protein > 0.0);
            previous = (kcal, protein);
        }

        let bands = &config.requirement_bands;
        for pair in bands.windows(2) {
            let (lo, hi) = (pair[0].min_months, pair[1].min_months - 1);
            assert_eq!(calorie_requirement(&config, lo), calorie_requirement(&config, hi));
            assert_eq!(
                protein_requirement(&config, lo, None),
                protein_requirement(&config, hi, None)
            );
        }
    }

    #[test]
    fn test_protein_prefers_weight() {
        let config = EvaluationConfig::default();
        assert!((protein_requirement(&config, 30, Some(10.0)) - 12.0).abs() < 1e-9);
        assert_eq!(protein_requirement(&config, 30, None), 14.0);
        assert_eq!(protein_requirement(&config, 30, Some(0.0)), 14.0);
    }

    #[test]
    fn test_age_below_first_band_uses_first_band() {
        let mut config = EvaluationConfig::default();
        config.requirement_bands.remove(0);
        assert_eq!(calorie_requirement(&config, 2), 500.0);
    }

    #[test]
    fn test_expected_gain_bands() {
        let config = EvaluationConfig::default();
        assert_eq!(expected_monthly_gain(&config, 8).weight_kg_per_month, 0.4);
        assert_eq!(expected_monthly_gain(&config, 12).height_cm_per_month, 1.5);
        assert_eq!(expected_monthly_gain(&config, 70).weight_kg_per_month, 0.2);
    }

    #[test]
    fn test_expected_weight() {
        let config = EvaluationConfig::default();
        assert_eq!(expected_weight_kg(&config, 6), 7.0);
        assert_eq!(expected_weight_kg(&config, 24), 12.0);
        assert_eq!(expected_weight_kg(&config, 72), 25.0);
    }

    #[test]
    fn test_expected_weight_follows_config() {
        let mut config = EvaluationConfig::default();
        config.expected_weight_bands[1].base_kg = 9.0;
        assert_eq!(expected_weight_kg(&config, 24), 13.0);
        assert_eq!(expected_weight_kg(&config, 6), 7.0);
    }
}
