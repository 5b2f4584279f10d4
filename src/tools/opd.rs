//! OPD Report MCP Tools
//!
//! Recording outpatient measurements (weight, height, MUAC).

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::parse_date;
use super::recommend::{evaluate_child, require_child};
use crate::db::Database;
use crate::evaluation::{EvaluationConfig, Report};
use crate::models::{OpdReport, OpdReportCreate};

/// Response for add_opd_report
#[derive(Debug, Serialize)]
pub struct AddOpdReportResponse {
    pub opd_report: OpdReport,
    pub recommendation: Report,
}

/// Response for list_opd_reports
#[derive(Debug, Serialize)]
pub struct ListOpdReportsResponse {
    pub child_id: i64,
    pub opd_reports: Vec<OpdReport>,
    pub total: usize,
}

/// Record an OPD visit and re-evaluate the child
#[allow(clippy::too_many_arguments)]
pub fn add_opd_report(
    db: &Database,
    config: &EvaluationConfig,
    today: NaiveDate,
    child_id: i64,
    date: &str,
    weight_kg: f64,
    height_cm: f64,
    muac_cm: Option<f64>,
    notes: Option<String>,
) -> Result<AddOpdReportResponse, String> {
    let data = OpdReportCreate {
        child_id,
        date: parse_date(date, "date")?,
        weight_kg,
        height_cm,
        muac_cm,
        notes: notes.filter(|n| !n.trim().is_empty()),
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let child = require_child(&conn, child_id)?;

    let opd_report = OpdReport::create(&conn, &data)
        .map_err(|e| format!("Failed to add OPD report: {}", e))?;
    info!(child_id, opd_report_id = opd_report.id, date = %opd_report.date, "recorded OPD report");

    let recommendation = evaluate_child(&conn, config, today, &child)?;

    Ok(AddOpdReportResponse {
        opd_report,
        recommendation,
    })
}

/// All OPD reports for a child, oldest first
pub fn list_opd_reports(db: &Database, child_id: i64) -> Result<ListOpdReportsResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    require_child(&conn, child_id)?;

    let opd_reports = OpdReport::list_for_child(&conn, child_id)
        .map_err(|e| format!("Database error: {}", e))?;
    let total = opd_reports.len();

    Ok(ListOpdReportsResponse {
        child_id,
        opd_reports,
        total,
    })
}
