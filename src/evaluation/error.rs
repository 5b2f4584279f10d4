//! Evaluation errors

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that reject an evaluation before any report is built
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error("Date of birth {date_of_birth} is after {today}")]
    InvalidDate {
        date_of_birth: NaiveDate,
        today: NaiveDate,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for evaluation operations
pub type EvaluationResult<T> = Result<T, EvaluationError>;
