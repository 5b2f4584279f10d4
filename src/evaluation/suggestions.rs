//! Suggestion composer
//!
//! Renders findings into ordered, caregiver-facing sentences. Order carries
//! meaning: adverse findings by descending severity, then data-collection
//! guidance, then informational notes, and always a feeding tip last.

use super::classifier::{Evidence, Finding, FindingKind, GrowthEvidence, IntakeEvidence};
use super::config::FeedingStages;

pub const NO_DATA_MESSAGE: &str = "No intake data provided. Please log daily intake.";
pub const ON_TRACK_MESSAGE: &str =
    "Nutrition and growth are on track. Keep up the current feeding routine.";

/// Compose the ordered suggestion list
pub fn compose(
    findings: &[Finding],
    feeding: &FeedingStages,
    age_months: u32,
    has_intake: bool,
) -> Vec<String> {
    let mut adverse: Vec<&Finding> = findings.iter().filter(|f| f.severity.is_adverse()).collect();
    // stable: equal severities keep classifier order
    adverse.sort_by(|a, b| b.severity.cmp(&a.severity));

    let mut suggestions: Vec<String> = adverse.iter().map(|f| render(f)).collect();

    if !has_intake {
        suggestions.push(NO_DATA_MESSAGE.to_string());
    } else if adverse.is_empty() {
        suggestions.push(ON_TRACK_MESSAGE.to_string());
    }

    suggestions.extend(
        findings
            .iter()
            .filter(|f| !f.severity.is_adverse() && f.kind != FindingKind::NoData)
            .map(render),
    );

    suggestions.push(feeding_tip(feeding, age_months).to_string());
    suggestions
}

/// Age-appropriate general feeding advice
pub fn feeding_tip(feeding: &FeedingStages, age_months: u32) -> &'static str {
    if age_months < feeding.complementary_from_months {
        "Feeding tips: breastfeed exclusively and on demand, 8 to 12 times a day; no water or other foods are needed yet."
    } else if age_months < feeding.family_foods_from_months {
        "Feeding tips: continue breastfeeding, offer mashed family foods 3 to 5 times a day, include eggs/legumes/dairy, add a spoon of oil for energy density."
    } else {
        "Feeding tips: increase meal frequency, include eggs/legumes/dairy, add healthy oils for energy density."
    }
}

/// Whole percent, truncated so a value below a band edge never prints as the edge
fn percent(ratio: f64) -> i64 {
    // 1e-9 absorbs representation error such as 0.29 * 100 = 28.999...
    (ratio * 100.0 + 1e-9).floor() as i64
}

/// One sentence for one finding
pub fn render(finding: &Finding) -> String {
    match (finding.kind, &finding.evidence) {
        (FindingKind::NoData, _) => NO_DATA_MESSAGE.to_string(),

        (FindingKind::UnderIntake, Evidence::CalorieIntake(e)) => format!(
            "Average intake {:.0} kcal/day ({}% of recommended {:.0} kcal/day). Increase energy-dense meals.",
            e.observed, percent(e.ratio), e.required
        ),
        (FindingKind::LowCalorieIntake, Evidence::CalorieIntake(e)) => format!(
            "Average intake {:.0} kcal/day is below the {:.0} kcal/day recommendation; monitor closely and add a snack between meals.",
            e.observed, e.required
        ),
        (FindingKind::ApproachingCalorieTarget, Evidence::CalorieIntake(e)) => format!(
            "Average intake {:.0} kcal/day is close to the {:.0} kcal/day target.",
            e.observed, e.required
        ),
        (FindingKind::CalorieTargetMet, _) => {
            "Average calorie intake meets the recommendation.".to_string()
        }
        (FindingKind::ExcessCalorieIntake, Evidence::CalorieIntake(e)) => format!(
            "Average intake {:.0} kcal/day is above the {:.0} kcal/day recommendation; check portion sizes and sugary snacks.",
            e.observed, e.required
        ),

        (FindingKind::ProteinUnderIntake, Evidence::ProteinIntake(e)) => format!(
            "Average protein {:.1} g/day ({}% of recommended {:.1} g/day). Add eggs, legumes, dairy or fish to daily meals.",
            e.observed, percent(e.ratio), e.required
        ),
        (FindingKind::LowProteinIntake, Evidence::ProteinIntake(e)) => protein_line(
            e,
            "is below the recommendation; include a protein food at every meal",
        ),
        (FindingKind::ApproachingProteinTarget, Evidence::ProteinIntake(e)) => {
            protein_line(e, "is close to the target")
        }
        (FindingKind::ProteinTargetMet, _) => {
            "Average protein intake meets the recommendation.".to_string()
        }
        (FindingKind::ExcessProteinIntake, Evidence::ProteinIntake(e)) => protein_line(
            e,
            "is well above the recommendation; keep meals balanced with grains, fruit and vegetables",
        ),

        (FindingKind::WeightLoss, Evidence::Growth(g)) => format!(
            "Weight decreased by {:.2} kg between the last two OPD reports. Clinical review recommended.",
            g.weight_delta_kg.abs()
        ),
        (FindingKind::SlowGrowth, Evidence::Growth(g)) => growth_line(
            g,
            "Growth has slowed",
            "Review feeding and any recent illness.",
        ),
        (FindingKind::AcceptableGrowth, Evidence::Growth(g)) => {
            growth_line(g, "Growth is acceptable but below the expected pace", "")
        }
        (FindingKind::GoodGrowth, Evidence::Growth(g)) => {
            growth_line(g, "Growth is on track", "")
        }

        (FindingKind::SevereUnderweight, Evidence::WeightForAge { weight_kg, expected_kg, ratio }) => format!(
            "Weight {:.1} kg is {}% of the expected {:.1} kg for age: severely underweight. Arrange a clinical review.",
            weight_kg, percent(*ratio), expected_kg
        ),
        (FindingKind::ModerateUnderweight, Evidence::WeightForAge { weight_kg, expected_kg, ratio }) => format!(
            "Weight {:.1} kg is {}% of the expected {:.1} kg for age: moderately underweight. Add an extra nutrient-dense meal each day.",
            weight_kg, percent(*ratio), expected_kg
        ),
        (FindingKind::Overweight, Evidence::WeightForAge { weight_kg, expected_kg, ratio }) => format!(
            "Weight {:.1} kg is {}% of the expected {:.1} kg for age. Favour whole foods and limit sugary drinks.",
            weight_kg, percent(*ratio), expected_kg
        ),

        (FindingKind::SevereAcuteMalnutrition, Evidence::Muac { muac_cm, threshold_cm, .. }) => format!(
            "MUAC {:.1} cm is below {:.1} cm: possible severe acute malnutrition. Refer to a clinician immediately.",
            muac_cm, threshold_cm
        ),
        (FindingKind::ModerateAcuteMalnutrition, Evidence::Muac { muac_cm, threshold_cm, .. }) => format!(
            "MUAC {:.1} cm is below {:.1} cm: moderate malnutrition risk. Nutritional counselling recommended.",
            muac_cm, threshold_cm
        ),
        (FindingKind::Wasting, Evidence::Bmi { bmi, threshold }) => format!(
            "BMI {:.1} is below {:.1}, a sign of wasting. Check weight-for-height at the next visit.",
            bmi, threshold
        ),
        (FindingKind::Stunting, Evidence::HeightForAge { height_cm, threshold_cm }) => format!(
            "Height {:.1} cm is below {:.1} cm for age: possible stunting. Measure height at every visit.",
            height_cm, threshold_cm
        ),

        // Findings are always built with matching evidence
        (kind, _) => format!("Finding: {}.", kind.as_str()),
    }
}

fn protein_line(e: &IntakeEvidence, verdict: &str) -> String {
    format!(
        "Average protein {:.1} g/day {} ({:.1} g/day).",
        e.observed, verdict, e.required
    )
}

fn growth_line(g: &GrowthEvidence, headline: &str, advice: &str) -> String {
    let mut line = match (g.weight_kg_per_month, g.height_cm_per_month) {
        (Some(weight), Some(height)) => format!(
            "{}: {:.2} kg and {:.1} cm per month against an expected {:.2} kg and {:.1} cm.",
            headline, weight, height, g.expected_weight_kg_per_month, g.expected_height_cm_per_month
        ),
        _ => format!("{}.", headline),
    };
    if !advice.is_empty() {
        line.push(' ');
        line.push_str(advice);
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::classifier::Severity;

    fn calorie(kind: FindingKind, observed: f64, required: f64) -> Finding {
        Finding::new(
            kind,
            Evidence::CalorieIntake(IntakeEvidence {
                observed,
                required,
                ratio: observed / required,
            }),
        )
    }

    #[test]
    fn test_no_data_guidance() {
        let findings = vec![Finding::new(FindingKind::NoData, Evidence::None)];
        let suggestions = compose(&findings, &FeedingStages::default(), 24, false);
        assert_eq!(suggestions[0], NO_DATA_MESSAGE);
        assert_eq!(suggestions.len(), 2);
        assert!(suggestions[1].starts_with("Feeding tips"));
    }

    #[test]
    fn test_on_track_when_nothing_adverse() {
        let findings = vec![calorie(FindingKind::CalorieTargetMet, 1200.0, 1200.0)];
        let suggestions = compose(&findings, &FeedingStages::default(), 30, true);
        assert_eq!(suggestions[0], ON_TRACK_MESSAGE);
        assert_eq!(suggestions[1], "Average calorie intake meets the recommendation.");
        assert!(suggestions.last().unwrap().starts_with("Feeding tips"));
    }

    #[test]
    fn test_most_severe_first() {
        let findings = vec![
            calorie(FindingKind::LowCalorieIntake, 900.0, 1200.0),
            Finding::new(
                FindingKind::SevereAcuteMalnutrition,
                Evidence::Muac {
                    muac_cm: 11.4,
                    threshold_cm: 11.5,
                    age_months: 30,
                },
            ),
        ];
        assert_eq!(findings[1].severity, Severity::Critical);
        let suggestions = compose(&findings, &FeedingStages::default(), 30, true);
        assert!(suggestions[0].starts_with("MUAC 11.4 cm"));
        assert!(suggestions[1].starts_with("Average intake 900 kcal/day"));
        assert!(!suggestions.contains(&ON_TRACK_MESSAGE.to_string()));
    }

    #[test]
    fn test_under_intake_template() {
        let text = render(&calorie(FindingKind::UnderIntake, 600.0, 1200.0));
        assert_eq!(
            text,
            "Average intake 600 kcal/day (50% of recommended 1200 kcal/day). Increase energy-dense meals."
        );
    }

    #[test]
    fn test_under_intake_percent_is_truncated() {
        // 839.9 / 1200 = 69.99%
        let text = render(&calorie(FindingKind::UnderIntake, 839.9, 1200.0));
        assert!(text.contains("(69% of recommended 1200 kcal/day)"), "{}", text);

        let low = render(&calorie(FindingKind::UnderIntake, 348.0, 1200.0));
        assert!(low.contains("(29% of recommended"), "{}", low);
    }

    #[test]
    fn test_feeding_tip_by_age() {
        let stages = FeedingStages::default();
        assert!(feeding_tip(&stages, 3).contains("exclusively"));
        assert!(feeding_tip(&stages, 6).contains("continue breastfeeding"));
        assert!(feeding_tip(&stages, 23).contains("continue breastfeeding"));
        assert!(feeding_tip(&stages, 48).contains("meal frequency"));

        let late = FeedingStages {
            complementary_from_months: 6,
            family_foods_from_months: 36,
        };
        assert!(feeding_tip(&late, 30).contains("continue breastfeeding"));
    }
}
