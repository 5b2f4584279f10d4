//! Recommendation MCP Tool
//!
//! Loads a child's stored records and runs them through the evaluation
//! engine.

use chrono::NaiveDate;
use rusqlite::Connection;
use serde::Serialize;
use tracing::info;

use crate::db::Database;
use crate::evaluation::{self, EvaluationConfig, IntakeRecord, MeasurementRecord, Report};
use crate::models::{Child, DailyIntake, OpdReport};

/// How many recent intake rows are loaded before the window is applied
pub const RECENT_INTAKE_FETCH: i64 = 14;

/// Response for recommend
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub child_id: i64,
    pub child_name: String,
    #[serde(flatten)]
    pub report: Report,
}

/// Evaluate a child from its stored records
pub(crate) fn evaluate_child(
    conn: &Connection,
    config: &EvaluationConfig,
    today: NaiveDate,
    child: &Child,
) -> Result<Report, String> {
    let intakes: Vec<IntakeRecord> = DailyIntake::list_recent(conn, child.id, RECENT_INTAKE_FETCH)
        .map_err(|e| format!("Database error: {}", e))?
        .iter()
        .take(config.intake_window)
        .map(DailyIntake::record)
        .collect();

    let measurements: Vec<MeasurementRecord> = OpdReport::list_for_child(conn, child.id)
        .map_err(|e| format!("Database error: {}", e))?
        .iter()
        .map(OpdReport::record)
        .collect();

    evaluation::evaluate(config, today, &child.profile(), &intakes, &measurements)
        .map_err(|e| format!("Evaluation failed: {}", e))
}

/// Look up a child or fail with a readable message
pub(crate) fn require_child(conn: &Connection, child_id: i64) -> Result<Child, String> {
    Child::get_by_id(conn, child_id)
        .map_err(|e| format!("Database error: {}", e))?
        .ok_or_else(|| format!("Child {} not found", child_id))
}

/// Current recommendation for a child
pub fn recommend(
    db: &Database,
    config: &EvaluationConfig,
    today: NaiveDate,
    child_id: i64,
) -> Result<RecommendResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let child = require_child(&conn, child_id)?;
    let report = evaluate_child(&conn, config, today, &child)?;

    info!(child_id, status = report.status.as_str(), "recommendation computed");

    Ok(RecommendResponse {
        child_id,
        child_name: child.name,
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::Status;
    use crate::models::{ChildCreate, DailyIntakeCreate, OpdReportCreate};
    use crate::tools::test_support::{date, test_db};

    fn seed_child(db: &Database) -> i64 {
        db.with_conn(|conn| {
            let child = Child::create(
                conn,
                &ChildCreate {
                    name: "Asha".to_string(),
                    date_of_birth: date("2024-06-15"),
                    sex: Default::default(),
                },
                date("2026-06-15"),
            )?;
            Ok(child.id)
        })
        .unwrap()
    }

    #[test]
    fn test_recommend_without_records() {
        let (_dir, db) = test_db();
        let id = seed_child(&db);
        let config = EvaluationConfig::default();

        let response = recommend(&db, &config, date("2026-06-15"), id).unwrap();
        assert_eq!(response.report.status, Status::NoData);
        assert_eq!(response.report.age_months, 24);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "no_data");
        assert_eq!(json["child_name"], "Asha");
    }

    #[test]
    fn test_recommend_uses_latest_week_only() {
        let (_dir, db) = test_db();
        let id = seed_child(&db);
        let config = EvaluationConfig::default();

        db.with_conn(|conn| {
            // a starving first week followed by a full week
            for day in 1..=14 {
                let calories = if day <= 7 { 100.0 } else { 1200.0 };
                DailyIntake::create(
                    conn,
                    &DailyIntakeCreate {
                        child_id: id,
                        date: date(&format!("2026-06-{:02}", day)),
                        meal_items: vec!["khichdi".to_string()],
                        total_calories: calories,
                        total_protein: 20.0,
                    },
                )?;
            }
            Ok(())
        })
        .unwrap();

        let response = recommend(&db, &config, date("2026-06-15"), id).unwrap();
        assert_eq!(response.report.average_intake.calories, 1200.0);
        assert_eq!(response.report.score, Some(1.0));
    }

    #[test]
    fn test_recommend_reads_opd_history() {
        let (_dir, db) = test_db();
        let id = seed_child(&db);
        let config = EvaluationConfig::default();

        db.with_conn(|conn| {
            // the trend is only read once intake has been logged
            DailyIntake::create(
                conn,
                &DailyIntakeCreate {
                    child_id: id,
                    date: date("2026-06-14"),
                    meal_items: vec!["khichdi".to_string()],
                    total_calories: 1200.0,
                    total_protein: 20.0,
                },
            )?;
            for (d, weight) in [("2026-04-10", 12.0), ("2026-05-10", 11.4)] {
                OpdReport::create(
                    conn,
                    &OpdReportCreate {
                        child_id: id,
                        date: date(d),
                        weight_kg: weight,
                        height_cm: 86.0,
                        muac_cm: None,
                        notes: None,
                    },
                )?;
            }
            Ok(())
        })
        .unwrap();

        let response = recommend(&db, &config, date("2026-06-15"), id).unwrap();
        assert_eq!(response.report.status, Status::WeightLoss);
    }

    #[test]
    fn test_recommend_unknown_child() {
        let (_dir, db) = test_db();
        let err = recommend(&db, &EvaluationConfig::default(), date("2026-06-15"), 42).unwrap_err();
        assert_eq!(err, "Child 42 not found");
    }
}
