//! Child MCP Tools
//!
//! Registering and looking up tracked children.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use super::parse_date;
use crate::db::Database;
use crate::evaluation::{age_in_months, Sex};
use crate::models::{Child, ChildCreate, DailyIntake, OpdReport};

/// Child detail with current age and record counts
#[derive(Debug, Serialize)]
pub struct ChildDetail {
    pub id: i64,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
    pub age_months: u32,
    pub intake_count: usize,
    pub opd_report_count: usize,
    pub created_at: String,
}

/// Child summary for listing
#[derive(Debug, Serialize)]
pub struct ChildSummary {
    pub id: i64,
    pub name: String,
    pub date_of_birth: NaiveDate,
    pub sex: Sex,
    pub age_months: Option<u32>,
}

/// Response for list_children
#[derive(Debug, Serialize)]
pub struct ListChildrenResponse {
    pub children: Vec<ChildSummary>,
    pub total: usize,
}

fn parse_sex(sex: Option<&str>) -> Result<Sex, String> {
    match sex.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Sex::Unknown),
        Some(s) => Sex::from_str(s)
            .ok_or_else(|| format!("Invalid sex '{}': expected male, female or unknown", s)),
    }
}

/// Register a new child
pub fn create_child(
    db: &Database,
    today: NaiveDate,
    name: &str,
    date_of_birth: &str,
    sex: Option<&str>,
) -> Result<ChildDetail, String> {
    let data = ChildCreate {
        name: name.to_string(),
        date_of_birth: parse_date(date_of_birth, "date_of_birth")?,
        sex: parse_sex(sex)?,
    };

    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let child = Child::create(&conn, &data, today)
        .map_err(|e| format!("Failed to create child: {}", e))?;

    info!(child_id = child.id, "registered child");

    let age_months = age_in_months(child.date_of_birth, today).map_err(|e| e.to_string())?;
    Ok(ChildDetail {
        id: child.id,
        name: child.name,
        date_of_birth: child.date_of_birth,
        sex: child.sex,
        age_months,
        intake_count: 0,
        opd_report_count: 0,
        created_at: child.created_at,
    })
}

/// Get a child with its current age
pub fn get_child(db: &Database, today: NaiveDate, id: i64) -> Result<Option<ChildDetail>, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;

    let child = match Child::get_by_id(&conn, id).map_err(|e| format!("Database error: {}", e))? {
        Some(child) => child,
        None => return Ok(None),
    };

    let intake_count = DailyIntake::list_for_child(&conn, id)
        .map_err(|e| format!("Database error: {}", e))?
        .len();
    let opd_report_count = OpdReport::list_for_child(&conn, id)
        .map_err(|e| format!("Database error: {}", e))?
        .len();
    let age_months = age_in_months(child.date_of_birth, today).map_err(|e| e.to_string())?;

    Ok(Some(ChildDetail {
        id: child.id,
        name: child.name,
        date_of_birth: child.date_of_birth,
        sex: child.sex,
        age_months,
        intake_count,
        opd_report_count,
        created_at: child.created_at,
    }))
}

/// List all children by name
pub fn list_children(db: &Database, today: NaiveDate) -> Result<ListChildrenResponse, String> {
    let conn = db.get_conn().map_err(|e| format!("Database error: {}", e))?;
    let children = Child::list(&conn).map_err(|e| format!("Database error: {}", e))?;

    let children: Vec<ChildSummary> = children
        .into_iter()
        .map(|c| ChildSummary {
            id: c.id,
            age_months: age_in_months(c.date_of_birth, today).ok(),
            name: c.name,
            date_of_birth: c.date_of_birth,
            sex: c.sex,
        })
        .collect();

    let total = children.len();
    Ok(ListChildrenResponse { children, total })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::test_support::{date, test_db};

    #[test]
    fn test_create_and_get_child() {
        let (_dir, db) = test_db();
        let today = date("2026-06-15");

        let created = create_child(&db, today, "Asha", "2024-03-10", Some("Female")).unwrap();
        assert_eq!(created.age_months, 27);
        assert_eq!(created.sex, Sex::Female);

        let fetched = get_child(&db, today, created.id).unwrap().unwrap();
        assert_eq!(fetched.name, "Asha");
        assert_eq!(fetched.intake_count, 0);

        assert!(get_child(&db, today, created.id + 100).unwrap().is_none());
    }

    #[test]
    fn test_create_child_defaults_and_rejections() {
        let (_dir, db) = test_db();
        let today = date("2026-06-15");

        let child = create_child(&db, today, "Ravi", "2025-01-01", None).unwrap();
        assert_eq!(child.sex, Sex::Unknown);

        assert!(create_child(&db, today, "Ravi", "2026-07-01", None).is_err());
        assert!(create_child(&db, today, "Ravi", "01/02/2025", None).is_err());
        assert!(create_child(&db, today, "Ravi", "2025-01-01", Some("x")).is_err());
        assert!(create_child(&db, today, "  ", "2025-01-01", None).is_err());
    }

    #[test]
    fn test_list_children() {
        let (_dir, db) = test_db();
        let today = date("2026-06-15");
        create_child(&db, today, "Meera", "2023-06-15", None).unwrap();
        create_child(&db, today, "Arjun", "2025-06-15", Some("male")).unwrap();

        let list = list_children(&db, today).unwrap();
        assert_eq!(list.total, 2);
        assert_eq!(list.children[0].name, "Arjun");
        assert_eq!(list.children[0].age_months, Some(12));
    }
}
