//! Status classifier
//!
//! Compares observed intake and measurements against the requirement tables
//! and emits structured findings. The overall status is taken from the single
//! most severe finding; message text is produced later by
//! `super::suggestions` and never inspected here.

use serde::Serialize;

use super::config::EvaluationConfig;
use super::input::{IntakeRecord, MeasurementRecord};
use super::requirements::{expected_monthly_gain, expected_weight_kg, Requirement};

/// How urgently a finding needs attention
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Caution,
    Warning,
    Urgent,
    Critical,
}

impl Severity {
    /// Findings at or above caution need action
    pub fn is_adverse(&self) -> bool {
        *self >= Severity::Caution
    }
}

/// Overall nutritional status of a child
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    NoData,
    Normal,
    AtRisk,
    SlowGrowth,
    Overweight,
    UnderIntake,
    ModerateMalnutrition,
    WeightLoss,
    SevereUnderweight,
    SevereAcuteMalnutrition,
}

impl Status {
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NoData => "no_data",
            Status::Normal => "normal",
            Status::AtRisk => "at_risk",
            Status::SlowGrowth => "slow_growth",
            Status::Overweight => "overweight",
            Status::UnderIntake => "under_intake",
            Status::ModerateMalnutrition => "moderate_malnutrition",
            Status::WeightLoss => "weight_loss",
            Status::SevereUnderweight => "severe_underweight",
            Status::SevereAcuteMalnutrition => "severe_acute_malnutrition",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Status::NoData | Status::Normal => Severity::Info,
            Status::AtRisk | Status::SlowGrowth | Status::Overweight => Severity::Caution,
            Status::UnderIntake | Status::ModerateMalnutrition => Severity::Warning,
            Status::WeightLoss | Status::SevereUnderweight => Severity::Urgent,
            Status::SevereAcuteMalnutrition => Severity::Critical,
        }
    }
}

/// Category of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    NoData,

    UnderIntake,
    LowCalorieIntake,
    ApproachingCalorieTarget,
    CalorieTargetMet,
    ExcessCalorieIntake,

    ProteinUnderIntake,
    LowProteinIntake,
    ApproachingProteinTarget,
    ProteinTargetMet,
    ExcessProteinIntake,

    WeightLoss,
    SlowGrowth,
    AcceptableGrowth,
    GoodGrowth,

    SevereUnderweight,
    ModerateUnderweight,
    Overweight,
    SevereAcuteMalnutrition,
    ModerateAcuteMalnutrition,
    Wasting,
    Stunting,
}

impl FindingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingKind::NoData => "no_data",
            FindingKind::UnderIntake => "under_intake",
            FindingKind::LowCalorieIntake => "low_calorie_intake",
            FindingKind::ApproachingCalorieTarget => "approaching_calorie_target",
            FindingKind::CalorieTargetMet => "calorie_target_met",
            FindingKind::ExcessCalorieIntake => "excess_calorie_intake",
            FindingKind::ProteinUnderIntake => "protein_under_intake",
            FindingKind::LowProteinIntake => "low_protein_intake",
            FindingKind::ApproachingProteinTarget => "approaching_protein_target",
            FindingKind::ProteinTargetMet => "protein_target_met",
            FindingKind::ExcessProteinIntake => "excess_protein_intake",
            FindingKind::WeightLoss => "weight_loss",
            FindingKind::SlowGrowth => "slow_growth",
            FindingKind::AcceptableGrowth => "acceptable_growth",
            FindingKind::GoodGrowth => "good_growth",
            FindingKind::SevereUnderweight => "severe_underweight",
            FindingKind::ModerateUnderweight => "moderate_underweight",
            FindingKind::Overweight => "overweight",
            FindingKind::SevereAcuteMalnutrition => "severe_acute_malnutrition",
            FindingKind::ModerateAcuteMalnutrition => "moderate_acute_malnutrition",
            FindingKind::Wasting => "wasting",
            FindingKind::Stunting => "stunting",
        }
    }

    /// Overall status this finding pushes the child towards
    pub fn status(&self) -> Status {
        match self {
            FindingKind::SevereAcuteMalnutrition => Status::SevereAcuteMalnutrition,
            FindingKind::SevereUnderweight => Status::SevereUnderweight,
            FindingKind::WeightLoss => Status::WeightLoss,
            FindingKind::ModerateAcuteMalnutrition
            | FindingKind::ModerateUnderweight
            | FindingKind::Wasting => Status::ModerateMalnutrition,
            FindingKind::UnderIntake | FindingKind::ProteinUnderIntake => Status::UnderIntake,
            FindingKind::LowCalorieIntake
            | FindingKind::LowProteinIntake
            | FindingKind::Stunting => Status::AtRisk,
            FindingKind::SlowGrowth => Status::SlowGrowth,
            FindingKind::Overweight => Status::Overweight,
            FindingKind::NoData => Status::NoData,
            FindingKind::ApproachingCalorieTarget
            | FindingKind::CalorieTargetMet
            | FindingKind::ExcessCalorieIntake
            | FindingKind::ApproachingProteinTarget
            | FindingKind::ProteinTargetMet
            | FindingKind::ExcessProteinIntake
            | FindingKind::AcceptableGrowth
            | FindingKind::GoodGrowth => Status::Normal,
        }
    }

    pub fn severity(&self) -> Severity {
        self.status().severity()
    }
}

/// Observed vs. required daily intake
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IntakeEvidence {
    pub observed: f64,
    pub required: f64,
    pub ratio: f64,
}

/// Change between the two most recent measurements
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GrowthEvidence {
    pub days_between: i64,
    pub weight_delta_kg: f64,
    pub height_delta_cm: f64,
    /// Absent when both measurements share a date
    pub weight_kg_per_month: Option<f64>,
    pub height_cm_per_month: Option<f64>,
    pub expected_weight_kg_per_month: f64,
    pub expected_height_cm_per_month: f64,
}

/// Numbers that triggered a finding
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Evidence {
    None,
    CalorieIntake(IntakeEvidence),
    ProteinIntake(IntakeEvidence),
    Growth(GrowthEvidence),
    WeightForAge {
        weight_kg: f64,
        expected_kg: f64,
        ratio: f64,
    },
    Muac {
        muac_cm: f64,
        threshold_cm: f64,
        age_months: u32,
    },
    Bmi {
        bmi: f64,
        threshold: f64,
    },
    HeightForAge {
        height_cm: f64,
        threshold_cm: f64,
    },
}

/// One classified observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Finding {
    pub kind: FindingKind,
    pub severity: Severity,
    pub evidence: Evidence,
}

impl Finding {
    pub fn new(kind: FindingKind, evidence: Evidence) -> Self {
        Self {
            kind,
            severity: kind.severity(),
            evidence,
        }
    }
}

/// Mean daily intake over the evaluated window
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AverageIntake {
    pub calories: f64,
    pub protein: f64,
}

/// Classifier output
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub status: Status,
    pub findings: Vec<Finding>,
    pub calorie_ratio: Option<f64>,
}

/// Mean calories and protein, or `None` for an empty window
pub fn average_intake(intakes: &[IntakeRecord]) -> Option<AverageIntake> {
    if intakes.is_empty() {
        return None;
    }
    let n = intakes.len() as f64;
    let (calories, protein) = intakes.iter().fold((0.0, 0.0), |(c, p), record| {
        (c + record.total_calories, p + record.total_protein_g)
    });
    Some(AverageIntake {
        calories: calories / n,
        protein: protein / n,
    })
}

/// Band an intake ratio: (urgent, warning, approaching, met, excess)
fn band_intake(
    config: &EvaluationConfig,
    ratio: f64,
    kinds: [FindingKind; 5],
) -> FindingKind {
    let t = &config.intake;
    if ratio < t.warning_from {
        kinds[0]
    } else if ratio < t.approaching_from {
        kinds[1]
    } else if ratio < t.met_from {
        kinds[2]
    } else if ratio < t.excess_from {
        kinds[3]
    } else {
        kinds[4]
    }
}

/// Classify mean calorie and protein intake against requirements
pub fn classify_intake(
    config: &EvaluationConfig,
    average: &AverageIntake,
    requirement: &Requirement,
) -> (Vec<Finding>, f64) {
    let calorie = IntakeEvidence {
        observed: average.calories,
        required: requirement.calorie_kcal_per_day,
        ratio: average.calories / requirement.calorie_kcal_per_day,
    };
    let protein = IntakeEvidence {
        observed: average.protein,
        required: requirement.protein_g_per_day,
        ratio: average.protein / requirement.protein_g_per_day,
    };

    let calorie_kind = band_intake(
        config,
        calorie.ratio,
        [
            FindingKind::UnderIntake,
            FindingKind::LowCalorieIntake,
            FindingKind::ApproachingCalorieTarget,
            FindingKind::CalorieTargetMet,
            FindingKind::ExcessCalorieIntake,
        ],
    );
    let protein_kind = band_intake(
        config,
        protein.ratio,
        [
            FindingKind::ProteinUnderIntake,
            FindingKind::LowProteinIntake,
            FindingKind::ApproachingProteinTarget,
            FindingKind::ProteinTargetMet,
            FindingKind::ExcessProteinIntake,
        ],
    );

    (
        vec![
            Finding::new(calorie_kind, Evidence::CalorieIntake(calorie)),
            Finding::new(protein_kind, Evidence::ProteinIntake(protein)),
        ],
        calorie.ratio,
    )
}

/// Trend between the two most recent measurements (`sorted` ascending by date)
pub fn classify_growth_trend(
    config: &EvaluationConfig,
    age_months: u32,
    sorted: &[MeasurementRecord],
) -> Option<Finding> {
    let [.., previous, latest] = sorted else {
        return None;
    };

    let expected = expected_monthly_gain(config, age_months);
    let days_between = (latest.date - previous.date).num_days();
    let weight_delta_kg = latest.weight_kg - previous.weight_kg;
    let height_delta_cm = latest.height_cm - previous.height_cm;

    let (weight_kg_per_month, height_cm_per_month) = if days_between > 0 {
        let months = days_between as f64 / config.growth_trend.days_per_month;
        (Some(weight_delta_kg / months), Some(height_delta_cm / months))
    } else {
        (None, None)
    };

    let evidence = GrowthEvidence {
        days_between,
        weight_delta_kg,
        height_delta_cm,
        weight_kg_per_month,
        height_cm_per_month,
        expected_weight_kg_per_month: expected.weight_kg_per_month,
        expected_height_cm_per_month: expected.height_cm_per_month,
    };

    if weight_delta_kg < 0.0 {
        return Some(Finding::new(FindingKind::WeightLoss, Evidence::Growth(evidence)));
    }

    // height velocity is reported but does not drive the class
    let Some(weight_rate) = weight_kg_per_month else {
        return None;
    };

    let ratio = weight_rate / expected.weight_kg_per_month;
    let kind = if ratio < config.growth_trend.slow_below {
        FindingKind::SlowGrowth
    } else if ratio < config.growth_trend.acceptable_below {
        FindingKind::AcceptableGrowth
    } else {
        FindingKind::GoodGrowth
    };

    Some(Finding::new(kind, Evidence::Growth(evidence)))
}

/// Weight-for-age, MUAC, BMI and height-for-age checks on one measurement
pub fn classify_latest_measurement(
    config: &EvaluationConfig,
    age_months: u32,
    latest: &MeasurementRecord,
) -> Vec<Finding> {
    let mut findings = Vec::new();

    let expected_kg = expected_weight_kg(config, age_months);
    let ratio = latest.weight_kg / expected_kg;
    let wfa = &config.weight_for_age;
    let weight_kind = if ratio < wfa.severe_below {
        Some(FindingKind::SevereUnderweight)
    } else if ratio < wfa.moderate_below {
        Some(FindingKind::ModerateUnderweight)
    } else if ratio > wfa.overweight_above {
        Some(FindingKind::Overweight)
    } else {
        None
    };
    if let Some(kind) = weight_kind {
        findings.push(Finding::new(
            kind,
            Evidence::WeightForAge {
                weight_kg: latest.weight_kg,
                expected_kg,
                ratio,
            },
        ));
    }

    let muac = &config.muac;
    if let Some(muac_cm) = latest.muac_cm.filter(|_| muac.applies_at(age_months)) {
        let classified = if muac_cm < muac.severe_below_cm {
            Some((FindingKind::SevereAcuteMalnutrition, muac.severe_below_cm))
        } else if muac_cm < muac.moderate_below_cm {
            Some((FindingKind::ModerateAcuteMalnutrition, muac.moderate_below_cm))
        } else {
            None
        };
        if let Some((kind, threshold_cm)) = classified {
            findings.push(Finding::new(
                kind,
                Evidence::Muac {
                    muac_cm,
                    threshold_cm,
                    age_months,
                },
            ));
        }
    }

    let shape = &config.body_shape;
    let bmi = latest.bmi();
    if age_months >= shape.wasting_min_age_months && bmi < shape.wasting_bmi_below {
        findings.push(Finding::new(
            FindingKind::Wasting,
            Evidence::Bmi {
                bmi,
                threshold: shape.wasting_bmi_below,
            },
        ));
    }

    let stunting_cm = shape.stunting_base_cm + shape.stunting_cm_per_month * f64::from(age_months);
    if latest.height_cm < stunting_cm {
        findings.push(Finding::new(
            FindingKind::Stunting,
            Evidence::HeightForAge {
                height_cm: latest.height_cm,
                threshold_cm: stunting_cm,
            },
        ));
    }

    findings
}

/// Status of the most severe finding; earlier findings win ties
pub fn aggregate_status(findings: &[Finding], has_intake: bool) -> Status {
    let baseline = if has_intake { Status::Normal } else { Status::NoData };
    findings
        .iter()
        .filter(|f| f.severity.is_adverse())
        .fold(baseline, |current, finding| {
            if finding.severity > current.severity() {
                finding.kind.status()
            } else {
                current
            }
        })
}

/// Run every classification step
///
/// `average` is `None` when the intake window is empty; `sorted` is the
/// measurement history ascending by date.
pub fn classify(
    config: &EvaluationConfig,
    age_months: u32,
    average: Option<&AverageIntake>,
    requirement: &Requirement,
    sorted: &[MeasurementRecord],
) -> Classification {
    let mut findings = Vec::new();
    let mut calorie_ratio = None;

    match average {
        Some(average) => {
            let (intake_findings, ratio) = classify_intake(config, average, requirement);
            findings.extend(intake_findings);
            calorie_ratio = Some(ratio);
        }
        None => findings.push(Finding::new(FindingKind::NoData, Evidence::None)),
    }

    // without intake data the trend step is skipped
    if average.is_some() {
        findings.extend(classify_growth_trend(config, age_months, sorted));
    }

    if let Some(latest) = sorted.last() {
        findings.extend(classify_latest_measurement(config, age_months, latest));
    }

    let status = aggregate_status(&findings, average.is_some());

    Classification {
        status,
        findings,
        calorie_ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::requirements::requirement_for;
    use chrono::NaiveDate;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn measurement(d: &str, weight_kg: f64, height_cm: f64, muac_cm: Option<f64>) -> MeasurementRecord {
        MeasurementRecord {
            date: date(d),
            weight_kg,
            height_cm,
            muac_cm,
            notes: None,
        }
    }

    fn calorie_kind(config: &EvaluationConfig, calories: f64) -> FindingKind {
        let requirement = requirement_for(config, 24, None);
        let average = AverageIntake {
            calories,
            protein: requirement.protein_g_per_day,
        };
        classify_intake(config, &average, &requirement).0[0].kind
    }

    #[test]
    fn test_intake_band_boundaries_inclusive_lower() {
        let config = EvaluationConfig::default();
        // 1200 kcal/day at 24 months
        assert_eq!(calorie_kind(&config, 839.88), FindingKind::UnderIntake);
        assert_eq!(calorie_kind(&config, 840.0), FindingKind::LowCalorieIntake);
        assert_eq!(calorie_kind(&config, 1019.0), FindingKind::LowCalorieIntake);
        assert_eq!(calorie_kind(&config, 1020.0), FindingKind::ApproachingCalorieTarget);
        assert_eq!(calorie_kind(&config, 1140.0), FindingKind::CalorieTargetMet);
        assert_eq!(calorie_kind(&config, 1319.0), FindingKind::CalorieTargetMet);
        assert_eq!(calorie_kind(&config, 1320.0), FindingKind::ExcessCalorieIntake);
    }

    #[test]
    fn test_protein_banded_independently() {
        let config = EvaluationConfig::default();
        let requirement = requirement_for(&config, 24, Some(10.0));
        let average = AverageIntake {
            calories: 1200.0,
            protein: 6.0,
        };
        let (findings, ratio) = classify_intake(&config, &average, &requirement);
        assert_eq!(findings[0].kind, FindingKind::CalorieTargetMet);
        assert_eq!(findings[1].kind, FindingKind::ProteinUnderIntake);
        assert!((ratio - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_intake() {
        let record = |d: &str, c: f64, p: f64| IntakeRecord {
            date: date(d),
            meal_items: Vec::new(),
            total_calories: c,
            total_protein_g: p,
        };
        assert_eq!(average_intake(&[]), None);
        let avg = average_intake(&[
            record("2026-03-01", 800.0, 20.0),
            record("2026-03-01", 1000.0, 30.0),
        ])
        .unwrap();
        assert_eq!(avg.calories, 900.0);
        assert_eq!(avg.protein, 25.0);
    }

    #[test]
    fn test_expected_gain_over_thirty_days_is_good_growth() {
        let config = EvaluationConfig::default();
        let sorted = vec![
            measurement("2026-03-01", 9.0, 75.0, None),
            measurement("2026-03-31", 9.25, 76.5, None),
        ];
        let finding = classify_growth_trend(&config, 14, &sorted).unwrap();
        assert_eq!(finding.kind, FindingKind::GoodGrowth);
    }

    #[test]
    fn test_slow_and_acceptable_growth() {
        let config = EvaluationConfig::default();
        let slow = vec![
            measurement("2026-03-01", 9.0, 75.0, None),
            measurement("2026-03-31", 9.1, 76.5, None),
        ];
        assert_eq!(
            classify_growth_trend(&config, 14, &slow).unwrap().kind,
            FindingKind::SlowGrowth
        );

        let acceptable = vec![
            measurement("2026-03-01", 9.0, 75.0, None),
            measurement("2026-03-31", 9.16, 76.5, None),
        ];
        assert_eq!(
            classify_growth_trend(&config, 14, &acceptable).unwrap().kind,
            FindingKind::AcceptableGrowth
        );
    }

    #[test]
    fn test_unchanged_height_keeps_good_weight_trend() {
        let config = EvaluationConfig::default();
        let sorted = vec![
            measurement("2026-05-01", 12.0, 88.0, None),
            measurement("2026-05-31", 12.2, 88.0, None),
        ];
        let finding = classify_growth_trend(&config, 24, &sorted).unwrap();
        assert_eq!(finding.kind, FindingKind::GoodGrowth);
        let Evidence::Growth(growth) = finding.evidence else {
            panic!("expected growth evidence");
        };
        assert_eq!(growth.height_cm_per_month, Some(0.0));
    }

    #[test]
    fn test_weight_loss_even_on_same_day() {
        let config = EvaluationConfig::default();
        let sorted = vec![
            measurement("2026-03-01", 9.5, 75.0, None),
            measurement("2026-03-01", 9.2, 75.0, None),
        ];
        let finding = classify_growth_trend(&config, 14, &sorted).unwrap();
        assert_eq!(finding.kind, FindingKind::WeightLoss);
        assert_eq!(finding.severity, Severity::Urgent);
    }

    #[test]
    fn test_same_day_without_loss_has_no_trend() {
        let config = EvaluationConfig::default();
        let sorted = vec![
            measurement("2026-03-01", 9.0, 75.0, None),
            measurement("2026-03-01", 9.0, 75.0, None),
        ];
        assert_eq!(classify_growth_trend(&config, 14, &sorted), None);
        assert_eq!(classify_growth_trend(&config, 14, &sorted[..1]), None);
    }

    #[test]
    fn test_muac_only_inside_age_window() {
        let config = EvaluationConfig::default();
        let thin = measurement("2026-03-01", 13.0, 92.0, Some(11.4));
        let kinds = |age| -> Vec<FindingKind> {
            classify_latest_measurement(&config, age, &thin)
                .iter()
                .map(|f| f.kind)
                .collect()
        };
        assert!(kinds(30).contains(&FindingKind::SevereAcuteMalnutrition));
        let older = kinds(70);
        assert!(!older.contains(&FindingKind::SevereAcuteMalnutrition));
        assert!(!older.contains(&FindingKind::ModerateAcuteMalnutrition));
    }

    #[test]
    fn test_weight_for_age_bands() {
        let config = EvaluationConfig::default();
        // expected 12 kg at 24 months
        let kind_for = |kg: f64| {
            classify_latest_measurement(&config, 24, &measurement("2026-03-01", kg, 86.0, None))
                .iter()
                .map(|f| f.kind)
                .find(|k| {
                    matches!(
                        k,
                        FindingKind::SevereUnderweight
                            | FindingKind::ModerateUnderweight
                            | FindingKind::Overweight
                    )
                })
        };
        assert_eq!(kind_for(8.0), Some(FindingKind::SevereUnderweight));
        assert_eq!(kind_for(10.0), Some(FindingKind::ModerateUnderweight));
        assert_eq!(kind_for(12.0), None);
        assert_eq!(kind_for(15.5), Some(FindingKind::Overweight));
    }

    #[test]
    fn test_wasting_and_stunting() {
        let config = EvaluationConfig::default();
        // BMI 10 / 0.81 = 12.3; height 90 cm >= 62 cm
        let findings = classify_latest_measurement(&config, 24, &measurement("2026-03-01", 10.0, 90.0, None));
        assert!(findings.iter().any(|f| f.kind == FindingKind::Wasting));
        assert!(!findings.iter().any(|f| f.kind == FindingKind::Stunting));

        let short = classify_latest_measurement(&config, 24, &measurement("2026-03-01", 7.0, 60.0, None));
        assert!(short.iter().any(|f| f.kind == FindingKind::Stunting));
    }

    #[test]
    fn test_aggregate_picks_most_severe() {
        let findings = vec![
            Finding::new(FindingKind::LowCalorieIntake, Evidence::None),
            Finding::new(FindingKind::WeightLoss, Evidence::None),
            Finding::new(FindingKind::ModerateAcuteMalnutrition, Evidence::None),
        ];
        assert_eq!(aggregate_status(&findings, true), Status::WeightLoss);
    }

    #[test]
    fn test_aggregate_tie_keeps_first() {
        let findings = vec![
            Finding::new(FindingKind::UnderIntake, Evidence::None),
            Finding::new(FindingKind::ModerateAcuteMalnutrition, Evidence::None),
        ];
        assert_eq!(aggregate_status(&findings, true), Status::UnderIntake);
    }

    #[test]
    fn test_aggregate_baselines() {
        let info = vec![Finding::new(FindingKind::CalorieTargetMet, Evidence::None)];
        assert_eq!(aggregate_status(&info, true), Status::Normal);
        assert_eq!(aggregate_status(&[], false), Status::NoData);
    }

    #[test]
    fn test_classify_without_intake_still_checks_measurements() {
        let config = EvaluationConfig::default();
        let requirement = requirement_for(&config, 30, Some(13.0));
        let sorted = vec![measurement("2026-03-01", 13.0, 92.0, Some(11.4))];
        let result = classify(&config, 30, None, &requirement, &sorted);
        assert_eq!(result.status, Status::SevereAcuteMalnutrition);
        assert_eq!(result.calorie_ratio, None);
        assert_eq!(result.findings[0].kind, FindingKind::NoData);
    }

    #[test]
    fn test_classify_without_intake_skips_trend() {
        let config = EvaluationConfig::default();
        let requirement = requirement_for(&config, 24, Some(12.0));
        let sorted = vec![
            measurement("2026-05-01", 12.2, 88.0, None),
            measurement("2026-05-31", 12.0, 88.0, None),
        ];
        let result = classify(&config, 24, None, &requirement, &sorted);
        assert_eq!(result.status, Status::NoData);
        assert!(!result.findings.iter().any(|f| f.kind == FindingKind::WeightLoss));

        let average = AverageIntake {
            calories: 1200.0,
            protein: 14.4,
        };
        let with_intake = classify(&config, 24, Some(&average), &requirement, &sorted);
        assert_eq!(with_intake.status, Status::WeightLoss);
    }
}
