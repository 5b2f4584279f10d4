//! Utility to load a population screening CSV into the database

use cgm::config::AppConfig;
use cgm::evaluation::{Clock, SystemClock};
use cgm::tools::screening;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let csv_path = std::env::args()
        .nth(1)
        .ok_or("usage: import_screening <screening.csv>")?;

    let config = AppConfig::from_env()?;
    println!("Database path: {}", config.database_path.display());
    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let database = cgm::db::Database::new(&config.database_path)?;

    // Run migrations
    database.with_conn(|conn| {
        cgm::db::migrations::run_migrations(conn)?;
        Ok(())
    })?;

    let result = screening::import_screening_csv(
        &database,
        &config.evaluation,
        &csv_path,
        SystemClock.today(),
    )?;
    println!(
        "Imported {} of {} rows from {}",
        result.imported, result.total_rows, result.file_path
    );
    println!(
        "  Wasted: {}  Underweight: {}  Stunted: {}",
        result.wasted, result.underweight, result.stunted
    );
    for error in &result.errors {
        println!("  Skipped: {}", error);
    }

    let summary = screening::screening_summary(&database)?;
    println!("Wasting rate by state:");
    for state in &summary.states {
        println!(
            "  {:<24} {:>6} children  {:>5.1}% wasted  {:>5.1}% underweight  {:>5.1}% stunted",
            state.state, state.total, state.wasted_rate, state.underweight_rate, state.stunted_rate
        );
    }

    Ok(())
}
