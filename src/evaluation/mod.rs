//! Evaluation engine
//!
//! Turns a child's age, a recent intake window and the measurement history
//! into a status, a score and ranked suggestions. Pure and synchronous: the
//! only outside input is "today", supplied through a [`Clock`].
//!
//! Pipeline: age resolver → requirement tables → status classifier →
//! suggestion composer.

pub mod age;
pub mod classifier;
pub mod clock;
pub mod config;
pub mod error;
pub mod input;
pub mod requirements;
pub mod suggestions;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

pub use age::age_in_months;
pub use classifier::{AverageIntake, Evidence, Finding, FindingKind, Severity, Status};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::EvaluationConfig;
pub use error::{EvaluationError, EvaluationResult};
pub use input::{ChildProfile, IntakeRecord, MeasurementRecord, Sex};
pub use requirements::Requirement;

/// Result of one evaluation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub status: Status,
    /// Calorie ratio (1.0 = requirement met), rounded to 2 decimals
    pub score: Option<f64>,
    pub suggestions: Vec<String>,
    pub findings: Vec<Finding>,
    pub age_months: u32,
    pub calorie_requirement: f64,
    pub protein_requirement: f64,
    pub average_intake: AverageIntake,
    pub evaluated_on: NaiveDate,
}

impl Report {
    /// Highest severity among the findings
    pub fn severity(&self) -> Severity {
        self.findings
            .iter()
            .map(|f| f.severity)
            .max()
            .unwrap_or(Severity::Info)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Evaluate a child as of `today`
///
/// `intakes` may be in any order; only the `config.intake_window` most recent
/// by date are used. `measurements` may be in any order.
pub fn evaluate(
    config: &EvaluationConfig,
    today: NaiveDate,
    child: &ChildProfile,
    intakes: &[IntakeRecord],
    measurements: &[MeasurementRecord],
) -> EvaluationResult<Report> {
    config.validate()?;
    let age_months = age_in_months(child.date_of_birth, today)?;
    for intake in intakes {
        intake.validate()?;
    }
    for measurement in measurements {
        measurement.validate()?;
    }

    let mut window: Vec<&IntakeRecord> = intakes.iter().collect();
    window.sort_by(|a, b| b.date.cmp(&a.date));
    window.truncate(config.intake_window);
    let window: Vec<IntakeRecord> = window.into_iter().cloned().collect();

    let mut sorted = measurements.to_vec();
    sorted.sort_by(|a, b| a.date.cmp(&b.date));

    let latest_weight = sorted.last().map(|m| m.weight_kg);
    let requirement = requirements::requirement_for(config, age_months, latest_weight);
    let average = classifier::average_intake(&window);

    let classification =
        classifier::classify(config, age_months, average.as_ref(), &requirement, &sorted);
    let suggestions = suggestions::compose(
        &classification.findings,
        &config.feeding,
        age_months,
        average.is_some(),
    );

    debug!(
        age_months,
        sex = child.sex.as_str(),
        calorie_requirement = requirement.calorie_kcal_per_day,
        intake_days = window.len(),
        measurements = sorted.len(),
        status = classification.status.as_str(),
        "evaluated child"
    );

    Ok(Report {
        status: classification.status,
        score: classification.calorie_ratio.map(round2),
        suggestions,
        findings: classification.findings,
        age_months,
        calorie_requirement: requirement.calorie_kcal_per_day,
        protein_requirement: requirement.protein_g_per_day,
        average_intake: average.unwrap_or_default(),
        evaluated_on: today,
    })
}

/// Evaluation engine bound to a threshold set and a clock
pub struct Evaluator<C: Clock = SystemClock> {
    config: EvaluationConfig,
    clock: C,
}

impl Evaluator<SystemClock> {
    pub fn new(config: EvaluationConfig) -> Self {
        Self::with_clock(config, SystemClock)
    }
}

impl<C: Clock> Evaluator<C> {
    pub fn with_clock(config: EvaluationConfig, clock: C) -> Self {
        Self { config, clock }
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn evaluate(
        &self,
        child: &ChildProfile,
        intakes: &[IntakeRecord],
        measurements: &[MeasurementRecord],
    ) -> EvaluationResult<Report> {
        evaluate(&self.config, self.clock.today(), child, intakes, measurements)
    }
}
