//! Daily Intake MCP Tools
//!
//! Logging what a child ate. Each write returns a fresh recommendation so
//! the caller sees the effect immediately.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::parse_date;
use super::recommend::{evaluate_child, require_child};
use crate::db::Database;
use crate::evaluation::{EvaluationConfig, Report};
use crate::models::{DailyIntake, DailyIntakeCreate};

/// Response for log_intake
#[derive(Debug, Serialize)]
pub struct LogIntakeResponse {
    pub intake: DailyIntake,
    pub recommendation: Report,
}

/// Response for list_intakes
#[derive(Debug, Serialize)]
pub struct ListIntakesResponse {
    pub child_id: i64,
    pub intakes: Vec<DailyIntake>,
    pub total: usize,
}

/// Log one day of intake and re-evaluate the child
#[allow(clippy::too_many_arguments)]
pub fn log_intake(
    db: &Database,
    config: &EvaluationConfig,
    today: NaiveDate,
    child_id: i64,
    date: &str,
    meal_items: Vec<String>,
    total_calories: f64,
    total_protein: f64,
) -> Result<LogIntakeResponse, String> {
    let data = DailyIntakeCreate {
        child_id,
        date: parse_date(date, "date")?,
        meal_items,
        total_calories,
        total_protein,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let child = require_child(&conn, child_id)?;

    let intake = DailyIntake::create(&conn, &data)
        .map_err(|e| format!("Failed to log intake: {}", e))?;
    info!(child_id, intake_id = intake.id, date = %intake.date, "logged intake");

    let recommendation = evaluate_child(&conn, config, today, &child)?;

    Ok(LogIntakeResponse {
        intake,
        recommendation,
    })
}

/// All intake rows for a child, oldest first
pub fn list_intakes(db: &Database, child_id: i64) -> Result<ListIntakesResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    require_child(&conn, child_id)?;

    let intakes = DailyIntake::list_for_child(&conn, child_id)
        .map_err(|e| format!("Database error: {}", e))?;
    let total = intakes.len();

    Ok(ListIntakesResponse {
        child_id,
        intakes,
        total,
    })
}
