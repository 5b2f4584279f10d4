//! CGM Status Tool
//!
//! Provides runtime status information and the usage guide for the CGM
//! service.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::evaluation::EvaluationConfig;

/// Evaluation workflow instructions for AI assistants
pub const EVALUATION_INSTRUCTIONS: &str = r#"
# CGM Evaluation Instructions

This guide explains how to track a child with the Child Growth Monitor (CGM)
tools and how to read the recommendation it returns.

## Workflow

1. **Register the child** with `create_child` (name, date_of_birth as
   YYYY-MM-DD, optional sex: male/female/unknown). Use `list_children` to
   find an existing child before creating a duplicate.
2. **Log daily intake** with `log_intake`: one call per day with the meal
   items and the day's total calories (kcal) and protein (g). Several calls
   for the same date are stored separately and are not merged.
3. **Record OPD visits** with `add_opd_report`: weight_kg and height_cm are
   required; muac_cm and notes are optional.
4. **Ask for a recommendation** with `recommend`. `log_intake` and
   `add_opd_report` also return a fresh recommendation.

## Reading a Recommendation

| Field | Meaning |
|-------|---------|
| `status` | Most severe condition found (see below) |
| `score` | Average calories / requirement (1.0 = met), null without intake data |
| `suggestions` | Ordered advice: most severe first, a feeding tip last |
| `findings` | Each finding with its severity and the numbers behind it |
| `age_months` | Age on the evaluation date |

Only the 7 most recent intake days are averaged. Growth velocity compares
weight across the last two OPD reports and is only read once intake has
been logged; height velocity is shown but does not set the class. MUAC,
BMI and height checks use the latest report.

### Status values (least to most severe)

- `no_data`: no intake logged yet. Ask the caregiver to log meals.
- `normal`: intake and growth on track.
- `at_risk`: intake slightly below target, or possible stunting.
- `slow_growth`, `overweight`: follow up at the next visit.
- `under_intake`: intake well below target; counselling recommended.
- `moderate_malnutrition`: low MUAC, moderate underweight or wasting.
- `weight_loss`, `severe_underweight`: clinical review recommended.
- `severe_acute_malnutrition`: refer to a clinician immediately.

MUAC thresholds apply only between 6 and 59 months of age.

## Population Screening

`import_screening_csv` loads a field screening CSV (columns child_id,
age_months, sex, weight_kg, height_cm, district, state, record_date) and
`screening_summary` reports wasting, underweight and stunting rates per
state. These are simple cutoffs for triage, not WHO z-scores.

## Important Notes

- Dates use ISO format: YYYY-MM-DD
- The birth date may not be in the future
- Calories and protein must be zero or more; weight, height and MUAC must
  be positive
- Deleting a child removes its intake and OPD records (cascade)
"#;

/// Runtime status of the CGM service
#[derive(Debug, Clone, Serialize)]
pub struct CgmStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,

    /// Database information
    pub database_path: String,
    pub database_size_bytes: Option<u64>,

    /// Evaluation settings
    pub intake_window: usize,
    pub protein_g_per_kg: f64,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
pub struct StatusTracker {
    start_time: Instant,
    database_path: PathBuf,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf) -> Self {
        Self {
            start_time: Instant::now(),
            database_path,
        }
    }

    /// Get the current status
    pub fn get_status(&self, config: &EvaluationConfig) -> CgmStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        CgmStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            intake_window: config.intake_window,
            protein_g_per_kg: config.protein_g_per_kg,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_reports_database_and_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cgm.db");
        std::fs::write(&path, b"sqlite").unwrap();

        let tracker = StatusTracker::new(path.clone());
        let status = tracker.get_status(&EvaluationConfig::default());
        assert_eq!(status.database_path, path.display().to_string());
        assert_eq!(status.database_size_bytes, Some(6));
        assert_eq!(status.intake_window, 7);
        assert_eq!(status.process_id, std::process::id());
    }

    #[test]
    fn test_missing_database_has_no_size() {
        let tracker = StatusTracker::new(PathBuf::from("/nonexistent/cgm.db"));
        assert_eq!(tracker.get_status(&EvaluationConfig::default()).database_size_bytes, None);
    }
}
