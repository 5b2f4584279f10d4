//! Data models
//!
//! Rust structs representing database entities.

mod child;
mod daily_intake;
mod opd_report;
mod screening;

pub use child::{Child, ChildCreate};
pub use daily_intake::{DailyIntake, DailyIntakeCreate};
pub use opd_report::{OpdReport, OpdReportCreate};
pub use screening::{Indicators, ScreeningRecord, ScreeningRecordCreate, StateSummary};
