//! Evaluation thresholds
//!
//! Every table and cutoff the classifier uses lives in one immutable
//! `EvaluationConfig`. `EvaluationConfig::default()` is the canonical set; a
//! JSON file can replace any part of it (see `crate::config`).
//!
//! These are illustrative screening cutoffs, not WHO growth standards.

use serde::{Deserialize, Serialize};

use super::error::{EvaluationError, EvaluationResult};

/// Daily requirements for children from `min_months` up to the next band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementBand {
    pub min_months: u32,
    pub calorie_kcal: f64,
    pub protein_g: f64,
}

/// Expected monthly gain for children from `min_months` up to the next band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrowthBand {
    pub min_months: u32,
    pub weight_kg_per_month: f64,
    pub height_cm_per_month: f64,
}

/// Expected weight `base_kg + kg_per_year * years` from `min_months` up to
/// the next band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedWeightBand {
    pub min_months: u32,
    pub base_kg: f64,
    pub kg_per_year: f64,
}

/// Intake ratio bands; each bound is the inclusive lower edge of the next band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeThresholds {
    pub warning_from: f64,
    pub approaching_from: f64,
    pub met_from: f64,
    pub excess_from: f64,
}

impl Default for IntakeThresholds {
    fn default() -> Self {
        Self {
            warning_from: 0.70,
            approaching_from: 0.85,
            met_from: 0.95,
            excess_from: 1.10,
        }
    }
}

/// Growth-trend ratios (observed gain / expected gain)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthTrendThresholds {
    pub slow_below: f64,
    pub acceptable_below: f64,
    pub days_per_month: f64,
}

impl Default for GrowthTrendThresholds {
    fn default() -> Self {
        Self {
            slow_below: 0.5,
            acceptable_below: 0.8,
            days_per_month: 30.4375,
        }
    }
}

/// Weight-for-age ratios against the expected-weight estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightForAgeThresholds {
    pub severe_below: f64,
    pub moderate_below: f64,
    pub overweight_above: f64,
}

impl Default for WeightForAgeThresholds {
    fn default() -> Self {
        Self {
            severe_below: 0.70,
            moderate_below: 0.85,
            overweight_above: 1.25,
        }
    }
}

/// MUAC cutoffs, applied only inside the age window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuacThresholds {
    pub severe_below_cm: f64,
    pub moderate_below_cm: f64,
    pub min_age_months: u32,
    pub max_age_months: u32,
}

impl Default for MuacThresholds {
    fn default() -> Self {
        Self {
            severe_below_cm: 11.5,
            moderate_below_cm: 12.5,
            min_age_months: 6,
            max_age_months: 59,
        }
    }
}

impl MuacThresholds {
    pub fn applies_at(&self, age_months: u32) -> bool {
        (self.min_age_months..=self.max_age_months).contains(&age_months)
    }
}

/// BMI wasting proxy and height-for-age stunting proxy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyShapeThresholds {
    pub wasting_bmi_below: f64,
    pub wasting_min_age_months: u32,
    /// Stunting when height < base + per_month * age
    pub stunting_base_cm: f64,
    pub stunting_cm_per_month: f64,
}

impl Default for BodyShapeThresholds {
    fn default() -> Self {
        Self {
            wasting_bmi_below: 13.5,
            wasting_min_age_months: 6,
            stunting_base_cm: 50.0,
            stunting_cm_per_month: 0.5,
        }
    }
}

/// Ages at which the general feeding advice changes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedingStages {
    /// Exclusive breastfeeding before this age
    pub complementary_from_months: u32,
    /// Family diet from this age
    pub family_foods_from_months: u32,
}

impl Default for FeedingStages {
    fn default() -> Self {
        Self {
            complementary_from_months: 6,
            family_foods_from_months: 24,
        }
    }
}

/// Population screening cutoffs; wasting and stunting reuse `body_shape`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningThresholds {
    pub underweight_kg_below: f64,
}

impl Default for ScreeningThresholds {
    fn default() -> Self {
        Self {
            underweight_kg_below: 10.0,
        }
    }
}

/// Complete threshold set for one evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Most recent intake records considered
    pub intake_window: usize,
    pub requirement_bands: Vec<RequirementBand>,
    pub protein_g_per_kg: f64,
    pub growth_bands: Vec<GrowthBand>,
    pub expected_weight_bands: Vec<ExpectedWeightBand>,
    pub intake: IntakeThresholds,
    pub growth_trend: GrowthTrendThresholds,
    pub weight_for_age: WeightForAgeThresholds,
    pub muac: MuacThresholds,
    pub body_shape: BodyShapeThresholds,
    pub feeding: FeedingStages,
    pub screening: ScreeningThresholds,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        let requirement = |min_months, calorie_kcal, protein_g| RequirementBand {
            min_months,
            calorie_kcal,
            protein_g,
        };
        let growth = |min_months, weight_kg_per_month, height_cm_per_month| GrowthBand {
            min_months,
            weight_kg_per_month,
            height_cm_per_month,
        };
        let weight = |min_months, base_kg, kg_per_year| ExpectedWeightBand {
            min_months,
            base_kg,
            kg_per_year,
        };

        Self {
            intake_window: 7,
            requirement_bands: vec![
                requirement(0, 450.0, 9.0),
                requirement(6, 500.0, 11.0),
                requirement(12, 900.0, 13.0),
                requirement(24, 1200.0, 14.0),
                requirement(36, 1400.0, 16.0),
                requirement(60, 1600.0, 20.0),
                requirement(84, 1800.0, 28.0),
                requirement(120, 2000.0, 40.0),
            ],
            protein_g_per_kg: 1.2,
            growth_bands: vec![
                growth(0, 0.4, 2.5),
                growth(12, 0.25, 1.5),
                growth(24, 0.2, 0.7),
            ],
            // 0.5 kg/month + 4 for infants, 2y + 8 to five years, 3y + 7 after
            expected_weight_bands: vec![
                weight(0, 4.0, 6.0),
                weight(12, 8.0, 2.0),
                weight(60, 7.0, 3.0),
            ],
            intake: IntakeThresholds::default(),
            growth_trend: GrowthTrendThresholds::default(),
            weight_for_age: WeightForAgeThresholds::default(),
            muac: MuacThresholds::default(),
            body_shape: BodyShapeThresholds::default(),
            feeding: FeedingStages::default(),
            screening: ScreeningThresholds::default(),
        }
    }
}

impl EvaluationConfig {
    /// Check that tables are usable: sorted, non-empty and never zero
    pub fn validate(&self) -> EvaluationResult<()> {
        if self.intake_window == 0 {
            return Err(invalid("intake_window must be at least 1"));
        }
        if self.requirement_bands.is_empty() {
            return Err(invalid("requirement_bands must not be empty"));
        }
        if self.growth_bands.is_empty() {
            return Err(invalid("growth_bands must not be empty"));
        }
        if self.expected_weight_bands.is_empty() {
            return Err(invalid("expected_weight_bands must not be empty"));
        }
        if !strictly_ascending(self.expected_weight_bands.iter().map(|b| b.min_months)) {
            return Err(invalid("expected_weight_bands must be sorted by min_months"));
        }
        for band in &self.expected_weight_bands {
            if !is_positive(band.base_kg) || !(band.kg_per_year.is_finite() && band.kg_per_year >= 0.0) {
                return Err(invalid(&format!(
                    "expected weight band from {} months must be positive",
                    band.min_months
                )));
            }
        }
        if !strictly_ascending(self.requirement_bands.iter().map(|b| b.min_months)) {
            return Err(invalid("requirement_bands must be sorted by min_months"));
        }
        if !strictly_ascending(self.growth_bands.iter().map(|b| b.min_months)) {
            return Err(invalid("growth_bands must be sorted by min_months"));
        }
        for band in &self.requirement_bands {
            if !is_positive(band.calorie_kcal) || !is_positive(band.protein_g) {
                return Err(invalid(&format!(
                    "requirement band from {} months must be positive",
                    band.min_months
                )));
            }
        }
        for band in &self.growth_bands {
            if !is_positive(band.weight_kg_per_month) || !is_positive(band.height_cm_per_month) {
                return Err(invalid(&format!(
                    "growth band from {} months must be positive",
                    band.min_months
                )));
            }
        }
        if !is_positive(self.protein_g_per_kg) {
            return Err(invalid("protein_g_per_kg must be positive"));
        }
        if !is_positive(self.growth_trend.days_per_month) {
            return Err(invalid("growth_trend.days_per_month must be positive"));
        }

        let i = &self.intake;
        if !(i.warning_from < i.approaching_from
            && i.approaching_from < i.met_from
            && i.met_from < i.excess_from)
        {
            return Err(invalid("intake thresholds must be strictly increasing"));
        }
        if self.growth_trend.slow_below > self.growth_trend.acceptable_below {
            return Err(invalid("growth_trend.slow_below exceeds acceptable_below"));
        }
        let w = &self.weight_for_age;
        if !(w.severe_below <= w.moderate_below && w.moderate_below < w.overweight_above) {
            return Err(invalid("weight_for_age thresholds are out of order"));
        }
        if self.muac.severe_below_cm > self.muac.moderate_below_cm
            || self.muac.min_age_months > self.muac.max_age_months
        {
            return Err(invalid("muac thresholds are out of order"));
        }
        if self.feeding.complementary_from_months > self.feeding.family_foods_from_months {
            return Err(invalid("feeding stages are out of order"));
        }
        if !is_positive(self.screening.underweight_kg_below) {
            return Err(invalid("screening.underweight_kg_below must be positive"));
        }

        Ok(())
    }
}

fn invalid(message: &str) -> EvaluationError {
    EvaluationError::InvalidInput(format!("Invalid evaluation config: {}", message))
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn strictly_ascending(mut values: impl Iterator<Item = u32>) -> bool {
    let Some(mut previous) = values.next() else {
        return true;
    };
    for value in values {
        if value <= previous {
            return false;
        }
        previous = value;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(EvaluationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_calorie_band() {
        let mut config = EvaluationConfig::default();
        config.requirement_bands[2].calorie_kcal = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_unsorted_bands() {
        let mut config = EvaluationConfig::default();
        config.requirement_bands.swap(1, 2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_overlapping_intake_thresholds() {
        let mut config = EvaluationConfig::default();
        config.intake.met_from = 0.80;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: EvaluationConfig =
            serde_json::from_str(r#"{"intake_window": 14, "muac": {"severe_below_cm": 11.0}}"#)
                .unwrap();
        assert_eq!(config.intake_window, 14);
        assert_eq!(config.muac.severe_below_cm, 11.0);
        assert_eq!(config.muac.moderate_below_cm, 12.5);
        assert_eq!(config.requirement_bands, EvaluationConfig::default().requirement_bands);
    }

    #[test]
    fn test_rejects_empty_expected_weight_table() {
        let mut config = EvaluationConfig::default();
        config.expected_weight_bands.clear();
        assert!(config.validate().is_err());

        let mut config = EvaluationConfig::default();
        config.expected_weight_bands[1].base_kg = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_reversed_feeding_stages() {
        let mut config = EvaluationConfig::default();
        config.feeding.complementary_from_months = 30;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_muac_window() {
        let muac = MuacThresholds::default();
        assert!(!muac.applies_at(5));
        assert!(muac.applies_at(6));
        assert!(muac.applies_at(59));
        assert!(!muac.applies_at(60));
    }
}
