//! OPD report model
//!
//! Outpatient clinical measurements. Weight and height are mandatory; a
//! report missing either is rejected before it is stored.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::evaluation::MeasurementRecord;

/// A stored OPD report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OpdReport {
    pub id: i64,
    pub child_id: i64,
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub muac_cm: Option<f64>,
    pub notes: Option<String>,
    pub recorded_at: String,
}

/// Data for recording an OPD report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpdReportCreate {
    pub child_id: i64,
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub muac_cm: Option<f64>,
    pub notes: Option<String>,
}

impl OpdReport {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            child_id: row.get("child_id")?,
            date: row.get("date")?,
            weight_kg: row.get("weight_kg")?,
            height_cm: row.get("height_cm")?,
            muac_cm: row.get("muac_cm")?,
            notes: row.get("notes")?,
            recorded_at: row.get("recorded_at")?,
        })
    }

    /// Store a validated OPD report
    pub fn create(conn: &Connection, data: &OpdReportCreate) -> DbResult<Self> {
        MeasurementRecord {
            date: data.date,
            weight_kg: data.weight_kg,
            height_cm: data.height_cm,
            muac_cm: data.muac_cm,
            notes: None,
        }
        .validate()?;

        conn.execute(
            r#"
            INSERT INTO opd_reports (child_id, date, weight_kg, height_cm, muac_cm, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                data.child_id,
                data.date,
                data.weight_kg,
                data.height_cm,
                data.muac_cm,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get an OPD report by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM opd_reports WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(report) => Ok(Some(report)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All OPD reports for a child, oldest first
    pub fn list_for_child(conn: &Connection, child_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM opd_reports WHERE child_id = ?1 ORDER BY date ASC, id ASC",
        )?;
        let reports = stmt
            .query_map([child_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(reports)
    }

    /// Engine view of this report
    pub fn record(&self) -> MeasurementRecord {
        MeasurementRecord {
            date: self.date,
            weight_kg: self.weight_kg,
            height_cm: self.height_cm,
            muac_cm: self.muac_cm,
            notes: self.notes.clone(),
        }
    }
}
