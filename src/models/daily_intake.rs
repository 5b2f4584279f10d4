//! Daily intake model
//!
//! One day of food intake for a child. Several rows for the same date are
//! allowed and are not merged.

use chrono::NaiveDate;
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::evaluation::IntakeRecord;

/// A logged day of intake
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyIntake {
    pub id: i64,
    pub child_id: i64,
    pub date: NaiveDate,
    pub meal_items: Vec<String>,
    pub total_calories: f64,
    pub total_protein: f64,
    pub recorded_at: String,
}

/// Data for logging a day of intake
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyIntakeCreate {
    pub child_id: i64,
    pub date: NaiveDate,
    #[serde(default)]
    pub meal_items: Vec<String>,
    pub total_calories: f64,
    pub total_protein: f64,
}

impl DailyIntakeCreate {
    fn record(&self) -> IntakeRecord {
        IntakeRecord {
            date: self.date,
            meal_items: self.meal_items.clone(),
            total_calories: self.total_calories,
            total_protein_g: self.total_protein,
        }
    }
}

impl DailyIntake {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let meal_items_json: String = row.get("meal_items")?;
        let meal_items = serde_json::from_str(&meal_items_json)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))?;

        Ok(Self {
            id: row.get("id")?,
            child_id: row.get("child_id")?,
            date: row.get("date")?,
            meal_items,
            total_calories: row.get("total_calories")?,
            total_protein: row.get("total_protein")?,
            recorded_at: row.get("recorded_at")?,
        })
    }

    /// Store a validated intake record
    pub fn create(conn: &Connection, data: &DailyIntakeCreate) -> DbResult<Self> {
        data.record().validate()?;
        let meal_items = serde_json::to_string(&data.meal_items)?;

        conn.execute(
            r#"
            INSERT INTO daily_intakes (child_id, date, meal_items, total_calories, total_protein)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
            params![
                data.child_id,
                data.date,
                meal_items,
                data.total_calories,
                data.total_protein,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get an intake record by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM daily_intakes WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(intake) => Ok(Some(intake)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// All intake records for a child, oldest first
    pub fn list_for_child(conn: &Connection, child_id: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM daily_intakes WHERE child_id = ?1 ORDER BY date ASC, id ASC",
        )?;
        let intakes = stmt
            .query_map([child_id], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(intakes)
    }

    /// Most recent intake records for a child, newest first
    pub fn list_recent(conn: &Connection, child_id: i64, limit: i64) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare(
            "SELECT * FROM daily_intakes WHERE child_id = ?1 ORDER BY date DESC, id DESC LIMIT ?2",
        )?;
        let intakes = stmt
            .query_map(params![child_id, limit], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(intakes)
    }

    /// Engine view of this record
    pub fn record(&self) -> IntakeRecord {
        IntakeRecord {
            date: self.date,
            meal_items: self.meal_items.clone(),
            total_calories: self.total_calories,
            total_protein_g: self.total_protein,
        }
    }
}
