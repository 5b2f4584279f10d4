//! Screening record model
//!
//! Population screening rows imported in bulk, each carrying simple
//! malnutrition indicators computed at import time. These are illustrative
//! cutoffs, not WHO z-scores.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::evaluation::EvaluationConfig;

/// Indicator flags for one screened child
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Indicators {
    pub wasted: bool,
    pub underweight: bool,
    pub stunted: bool,
}

impl Indicators {
    /// Flags for one child; the BMI cutoff applies at every age here
    pub fn compute(
        config: &EvaluationConfig,
        age_months: u32,
        weight_kg: f64,
        height_cm: f64,
    ) -> Self {
        let shape = &config.body_shape;
        let height_m = height_cm / 100.0;
        let bmi = weight_kg / (height_m * height_m);
        let stunting_cm = shape.stunting_base_cm + shape.stunting_cm_per_month * f64::from(age_months);
        Self {
            wasted: bmi < shape.wasting_bmi_below,
            underweight: weight_kg < config.screening.underweight_kg_below,
            stunted: height_cm < stunting_cm,
        }
    }
}

/// A stored screening row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningRecord {
    pub id: i64,
    pub child_ref: Option<String>,
    pub age_months: u32,
    pub sex: Option<String>,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub district: Option<String>,
    pub state: Option<String>,
    pub record_date: NaiveDate,
    pub indicators: Indicators,
}

/// Data for one screening row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningRecordCreate {
    pub child_ref: Option<String>,
    pub age_months: u32,
    pub sex: Option<String>,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub district: Option<String>,
    pub state: Option<String>,
    pub record_date: NaiveDate,
}

/// Indicator counts and rates for one state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSummary {
    pub state: String,
    pub total: i64,
    pub wasted: i64,
    pub underweight: i64,
    pub stunted: i64,
    pub wasted_rate: f64,
    pub underweight_rate: f64,
    pub stunted_rate: f64,
}

impl ScreeningRecord {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            child_ref: row.get("child_ref")?,
            age_months: row.get("age_months")?,
            sex: row.get("sex")?,
            weight_kg: row.get("weight_kg")?,
            height_cm: row.get("height_cm")?,
            district: row.get("district")?,
            state: row.get("state")?,
            record_date: row.get("record_date")?,
            indicators: Indicators {
                wasted: row.get("wasted")?,
                underweight: row.get("underweight")?,
                stunted: row.get("stunted")?,
            },
        })
    }

    /// Store a row with freshly computed indicators
    pub fn create(
        conn: &Connection,
        config: &EvaluationConfig,
        data: &ScreeningRecordCreate,
    ) -> DbResult<Self> {
        let indicators =
            Indicators::compute(config, data.age_months, data.weight_kg, data.height_cm);

        conn.execute(
            r#"
            INSERT INTO screening_records
                (child_ref, age_months, sex, weight_kg, height_cm, district, state,
                 record_date, wasted, underweight, stunted)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                data.child_ref,
                data.age_months,
                data.sex,
                data.weight_kg,
                data.height_cm,
                data.district,
                data.state,
                data.record_date,
                indicators.wasted,
                indicators.underweight,
                indicators.stunted,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a screening row by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM screening_records WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(record) => Ok(Some(record)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Most recent screening rows
    pub fn list_recent(conn: &Connection, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM screening_records ORDER BY record_date DESC, id DESC LIMIT ?1",
        )?;
        let records = stmt
            .query_map([limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    /// Per-state indicator rates, highest wasting rate first
    pub fn summarize_by_state(conn: &Connection) -> DbResult<Vec<StateSummary>> {
        let mut stmt = conn.prepare(
            r#"
            SELECT COALESCE(state, 'unknown') AS state_name,
                   COUNT(*) AS total,
                   SUM(wasted) AS wasted,
                   SUM(underweight) AS underweight,
                   SUM(stunted) AS stunted
            FROM screening_records
            GROUP BY state_name
            "#,
        )?;

        let mut summaries = stmt
            .query_map([], |row| {
                let total: i64 = row.get("total")?;
                let wasted: i64 = row.get("wasted")?;
                let underweight: i64 = row.get("underweight")?;
                let stunted: i64 = row.get("stunted")?;
                let rate = |count: i64| count as f64 / total as f64 * 100.0;
                Ok(StateSummary {
                    state: row.get("state_name")?,
                    total,
                    wasted,
                    underweight,
                    stunted,
                    wasted_rate: rate(wasted),
                    underweight_rate: rate(underweight),
                    stunted_rate: rate(stunted),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        summaries.sort_by(|a, b| {
            b.wasted_rate
                .total_cmp(&a.wasted_rate)
                .then_with(|| a.state.cmp(&b.state))
        });

        Ok(summaries)
    }
}
