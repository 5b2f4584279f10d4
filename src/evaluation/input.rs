//! Evaluation inputs
//!
//! Plain snapshots handed to the engine by the storage layer. The engine only
//! reads them; ownership and persistence live in `crate::models`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::error::{EvaluationError, EvaluationResult};

/// Sex of a child
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    #[default]
    Unknown,
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "male",
            Sex::Female => "female",
            Sex::Unknown => "unknown",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" | "boy" => Some(Sex::Male),
            "female" | "f" | "girl" => Some(Sex::Female),
            "unknown" | "u" | "" => Some(Sex::Unknown),
            _ => None,
        }
    }
}

/// The parts of a child the engine needs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildProfile {
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub sex: Sex,
}

/// One day of recorded intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntakeRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub meal_items: Vec<String>,
    pub total_calories: f64,
    pub total_protein_g: f64,
}

impl IntakeRecord {
    /// Reject negative or non-finite totals
    pub fn validate(&self) -> EvaluationResult<()> {
        non_negative("total_calories", self.total_calories, self.date)?;
        non_negative("total_protein", self.total_protein_g, self.date)
    }
}

/// A clinical (OPD) measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub muac_cm: Option<f64>,
    pub notes: Option<String>,
}

impl MeasurementRecord {
    /// Weight and height must be positive; MUAC positive when present
    pub fn validate(&self) -> EvaluationResult<()> {
        positive("weight_kg", self.weight_kg, self.date)?;
        positive("height_cm", self.height_cm, self.date)?;
        if let Some(muac) = self.muac_cm {
            positive("muac_cm", muac, self.date)?;
        }
        Ok(())
    }

    /// Body-mass index in kg/m²
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        self.weight_kg / (height_m * height_m)
    }
}

fn non_negative(field: &str, value: f64, date: NaiveDate) -> EvaluationResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(EvaluationError::InvalidInput(format!(
            "{} must be a non-negative number (got {} on {})",
            field, value, date
        )));
    }
    Ok(())
}

fn positive(field: &str, value: f64, date: NaiveDate) -> EvaluationResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(EvaluationError::InvalidInput(format!(
            "{} must be greater than zero (got {} on {})",
            field, value, date
        )));
    }
    Ok(())
}
