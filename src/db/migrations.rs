//! Database migrations
//!
//! Schema creation and migration logic.

use rusqlite::Connection;

use super::connection::DbResult;

/// Current schema version
pub const SCHEMA_VERSION: i32 = 2;

/// Run all migrations to bring the database up to the current schema version
pub fn run_migrations(conn: &Connection) -> DbResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        migrate_v1(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (1)", [])?;
    }

    if current_version < 2 {
        migrate_v2(conn)?;
        conn.execute("INSERT INTO schema_migrations (version) VALUES (2)", [])?;
    }

    Ok(())
}

/// Migration v1: children, intake and OPD records
fn migrate_v1(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        -- ============================================
        -- CHILDREN
        -- ============================================
        CREATE TABLE children (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            date_of_birth TEXT NOT NULL,         -- ISO date: "2024-06-15"
            sex TEXT NOT NULL CHECK(sex IN ('male', 'female', 'unknown')) DEFAULT 'unknown',
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_children_name ON children(name);

        -- ============================================
        -- DAILY INTAKES
        -- One row per logged day; duplicates for a date are kept
        -- ============================================
        CREATE TABLE daily_intakes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            child_id INTEGER NOT NULL REFERENCES children(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            meal_items TEXT NOT NULL DEFAULT '[]', -- JSON array of strings
            total_calories REAL NOT NULL CHECK(total_calories >= 0),
            total_protein REAL NOT NULL CHECK(total_protein >= 0),
            recorded_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_daily_intakes_child_date ON daily_intakes(child_id, date);

        -- ============================================
        -- OPD REPORTS
        -- Clinical measurements
        -- ============================================
        CREATE TABLE opd_reports (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            child_id INTEGER NOT NULL REFERENCES children(id) ON DELETE CASCADE,
            date TEXT NOT NULL,
            weight_kg REAL NOT NULL CHECK(weight_kg > 0),
            height_cm REAL NOT NULL CHECK(height_cm > 0),
            muac_cm REAL CHECK(muac_cm IS NULL OR muac_cm > 0),
            notes TEXT,
            recorded_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_opd_reports_child_date ON opd_reports(child_id, date);
        "#,
    )?;

    Ok(())
}

/// Migration v2: population screening records
fn migrate_v2(conn: &Connection) -> DbResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE screening_records (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            child_ref TEXT,                      -- identifier from the source file
            age_months INTEGER NOT NULL DEFAULT 0,
            sex TEXT,
            weight_kg REAL NOT NULL,
            height_cm REAL NOT NULL,
            district TEXT,
            state TEXT,
            record_date TEXT NOT NULL,

            -- Indicators computed at import
            wasted INTEGER NOT NULL DEFAULT 0,
            underweight INTEGER NOT NULL DEFAULT 0,
            stunted INTEGER NOT NULL DEFAULT 0,

            imported_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX idx_screening_state ON screening_records(state);
        "#,
    )?;

    Ok(())
}

/// Get the current schema version
pub fn get_schema_version(conn: &Connection) -> DbResult<i32> {
    let version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);
    Ok(version)
}

/// Check if the database needs migration
pub fn needs_migration(conn: &Connection) -> DbResult<bool> {
    let current = get_schema_version(conn)?;
    Ok(current < SCHEMA_VERSION)
}
