//! Utility to register a demo child with a week of intake and two OPD visits

use chrono::Duration;

use cgm::config::AppConfig;
use cgm::evaluation::{Clock, Evaluator, Sex, SystemClock};
use cgm::models::{Child, ChildCreate, DailyIntake, DailyIntakeCreate, OpdReport, OpdReportCreate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
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

    let today = SystemClock.today();
    let evaluator = Evaluator::new(config.evaluation);

    let (child, intakes, reports) = database.with_transaction(|tx| {
        let child = Child::create(
            tx,
            &ChildCreate {
                name: "Demo Child".to_string(),
                date_of_birth: today - Duration::days(2 * 365),
                sex: Sex::Female,
            },
            today,
        )?;

        let mut intakes = Vec::new();
        for day in 1..=7 {
            intakes.push(DailyIntake::create(
                tx,
                &DailyIntakeCreate {
                    child_id: child.id,
                    date: today - Duration::days(day),
                    meal_items: vec!["rice".to_string(), "dal".to_string(), "banana".to_string()],
                    total_calories: 850.0 + 20.0 * day as f64,
                    total_protein: 14.0,
                },
            )?);
        }

        let mut reports = Vec::new();
        for (days_ago, weight_kg, height_cm, muac_cm) in [(60, 10.6, 82.0, 12.6), (30, 10.7, 82.5, 12.4)] {
            reports.push(OpdReport::create(
                tx,
                &OpdReportCreate {
                    child_id: child.id,
                    date: today - Duration::days(days_ago),
                    weight_kg,
                    height_cm,
                    muac_cm: Some(muac_cm),
                    notes: None,
                },
            )?);
        }

        Ok((child, intakes, reports))
    })?;

    println!("Demo child created:");
    println!("  ID: {}", child.id);
    println!("  Name: {}", child.name);
    println!("  DOB: {}", child.date_of_birth);
    println!("  Intake days: {}", intakes.len());
    println!("  OPD reports: {}", reports.len());

    let intake_records: Vec<_> = intakes.iter().map(DailyIntake::record).collect();
    let measurements: Vec<_> = reports.iter().map(OpdReport::record).collect();
    let report = evaluator.evaluate(&child.profile(), &intake_records, &measurements)?;

    println!("Recommendation:");
    println!("  Status: {} ({:?})", report.status.as_str(), report.severity());
    if let Some(score) = report.score {
        println!("  Score: {:.2}", score);
    }
    for suggestion in &report.suggestions {
        println!("  - {}", suggestion);
    }

    Ok(())
}
