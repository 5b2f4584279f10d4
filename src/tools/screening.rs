//! Population Screening MCP Tools
//!
//! Bulk import of field screening CSVs and per-state indicator rates.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{info, warn};

use crate::db::Database;
use crate::evaluation::EvaluationConfig;
use crate::models::{ScreeningRecord, ScreeningRecordCreate, StateSummary};

/// Response for import_screening_csv
#[derive(Debug, Serialize)]
pub struct ImportScreeningResponse {
    pub success: bool,
    pub file_path: String,
    pub total_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub wasted: usize,
    pub underweight: usize,
    pub stunted: usize,
    pub errors: Vec<String>,
}

/// Response for screening_summary
#[derive(Debug, Serialize)]
pub struct ScreeningSummaryResponse {
    pub states: Vec<StateSummary>,
    pub total_records: i64,
}

/// Column positions resolved from the header row
struct Columns {
    index: HashMap<String, usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, name)| (name.trim().to_lowercase(), i))
            .collect();
        Self { index }
    }

    fn text(&self, record: &csv::StringRecord, name: &str) -> Option<String> {
        self.index
            .get(name)
            .and_then(|&i| record.get(i))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    fn number(&self, record: &csv::StringRecord, name: &str) -> Option<f64> {
        self.text(record, name)
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v > 0.0)
    }
}

/// Parse one data row; `None` when weight or height is unusable
fn parse_row(
    columns: &Columns,
    record: &csv::StringRecord,
    today: NaiveDate,
) -> Option<ScreeningRecordCreate> {
    let weight_kg = columns.number(record, "weight_kg")?;
    let height_cm = columns.number(record, "height_cm")?;

    let age_months = columns
        .text(record, "age_months")
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite() && *v >= 0.0)
        .map(|v| v as u32)
        .unwrap_or(0);

    let record_date = columns
        .text(record, "record_date")
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())
        .unwrap_or(today);

    Some(ScreeningRecordCreate {
        child_ref: columns.text(record, "child_id"),
        age_months,
        sex: columns.text(record, "sex").map(|s| s.to_lowercase()),
        weight_kg,
        height_cm,
        district: columns.text(record, "district"),
        state: columns.text(record, "state"),
        record_date,
    })
}

/// Import a screening CSV; rows missing weight or height are skipped
pub fn import_screening_csv(
    db: &Database,
    config: &EvaluationConfig,
    file_path: &str,
    today: NaiveDate,
) -> Result<ImportScreeningResponse, String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(file_path)
        .map_err(|e| format!("Failed to open file '{}': {}", file_path, e))?;

    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read header row: {}", e))?;
    let columns = Columns::from_headers(headers);

    let mut rows = Vec::new();
    let mut errors = Vec::new();
    let mut total_rows = 0;

    for (row_idx, result) in reader.records().enumerate() {
        total_rows += 1;
        // +2: one-based, after the header
        let row_number = row_idx + 2;

        let record = match result {
            Ok(record) => record,
            Err(e) => {
                errors.push(format!("Row {}: {}", row_number, e));
                continue;
            }
        };

        match parse_row(&columns, &record, today) {
            Some(row) => rows.push(row),
            None => errors.push(format!("Row {}: missing or invalid weight_kg/height_cm", row_number)),
        }
    }

    let stored = db
        .with_transaction(|tx| {
            rows.iter()
                .map(|row| ScreeningRecord::create(tx, config, row))
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(|e| format!("Failed to store screening records: {}", e))?;

    let skipped = total_rows - stored.len();
    if skipped > 0 {
        warn!(file_path, skipped, "skipped screening rows");
    }
    info!(file_path, imported = stored.len(), "imported screening records");

    Ok(ImportScreeningResponse {
        success: true,
        file_path: file_path.to_string(),
        total_rows,
        imported: stored.len(),
        skipped,
        wasted: stored.iter().filter(|r| r.indicators.wasted).count(),
        underweight: stored.iter().filter(|r| r.indicators.underweight).count(),
        stunted: stored.iter().filter(|r| r.indicators.stunted).count(),
        errors,
    })
}

/// Indicator rates per state, highest wasting rate first
pub fn screening_summary(db: &Database) -> Result<ScreeningSummaryResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let states = ScreeningRecord::summarize_by_state(&conn)
        .map_err(|e| format!("Database error: {}", e))?;
    let total_records = states.iter().map(|s| s.total).sum();

    Ok(ScreeningSummaryResponse {
        states,
        total_records,
    })
}
