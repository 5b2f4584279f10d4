//! Child model
//!
//! A child whose intake and growth are tracked. Intake and OPD records hang
//! off a child and are removed with it.

use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};

use crate::db::{DbError, DbResult};
use crate::evaluation::{age_in_months, ChildProfile, EvaluationError, Sex};

/// A tracked child
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: i64,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
    pub created_at: String,
}

/// Data for registering a child
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildCreate {
    pub name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub sex: Sex,
}

impl Child {
    /// Create from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let sex: String = row.get("sex")?;
        Ok(Self {
            id: row.get("id")?,
            name: row.get("name")?,
            date_of_birth: row.get("date_of_birth")?,
            sex: Sex::from_str(&sex).unwrap_or_default(),
            created_at: row.get("created_at")?,
        })
    }

    /// Register a child; the birth date may not be after `today`
    pub fn create(conn: &Connection, data: &ChildCreate, today: NaiveDate) -> DbResult<Self> {
        if data.name.trim().is_empty() {
            return Err(EvaluationError::InvalidInput("name must not be empty".to_string()).into());
        }
        age_in_months(data.date_of_birth, today)?;

        conn.execute(
            "INSERT INTO children (name, date_of_birth, sex) VALUES (?1, ?2, ?3)",
            params![data.name.trim(), data.date_of_birth, data.sex.as_str()],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?
            .ok_or(DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Get a child by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM children WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(child) => Ok(Some(child)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List all children by name
    pub fn list(conn: &Connection) -> DbResult<Vec<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM children ORDER BY name, id")?;
        let children = stmt
            .query_map([], Self::from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(children)
    }

    /// Delete a child and, through the cascade, all of its records
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM children WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }

    /// Engine view of this child
    pub fn profile(&self) -> ChildProfile {
        ChildProfile {
            date_of_birth: self.date_of_birth,
            sex: self.sex,
        }
    }
}
