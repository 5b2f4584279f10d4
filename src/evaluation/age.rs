//! Age resolution
//!
//! Whole months between a birth date and a reference date. A month only
//! counts once its day-of-month has been reached: born on the 20th, a child
//! turns one month on the 20th of the following month, not on the 1st.

use chrono::{Datelike, NaiveDate};

use super::error::{EvaluationError, EvaluationResult};

/// Whole months elapsed from `date_of_birth` to `today`
pub fn age_in_months(date_of_birth: NaiveDate, today: NaiveDate) -> EvaluationResult<u32> {
    if date_of_birth > today {
        return Err(EvaluationError::InvalidDate {
            date_of_birth,
            today,
        });
    }

    let mut months = (today.year() - date_of_birth.year()) * 12 + today.month() as i32
        - date_of_birth.month() as i32;
    if today.day() < date_of_birth.day() {
        months -= 1;
    }

    Ok(months.max(0) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_born_today_is_zero() {
        assert_eq!(age_in_months(date("2026-05-10"), date("2026-05-10")), Ok(0));
    }

    #[test]
    fn test_exact_months() {
        assert_eq!(age_in_months(date("2024-05-10"), date("2026-05-10")), Ok(24));
        assert_eq!(age_in_months(date("2025-12-10"), date("2026-02-10")), Ok(2));
    }

    #[test]
    fn test_day_not_yet_reached() {
        assert_eq!(age_in_months(date("2024-05-20"), date("2026-05-19")), Ok(23));
        assert_eq!(age_in_months(date("2024-05-20"), date("2026-05-20")), Ok(24));
    }

    #[test]
    fn test_month_end_birthday() {
        // Jan 31 never reaches day 31 in February
        assert_eq!(age_in_months(date("2026-01-31"), date("2026-02-28")), Ok(0));
        assert_eq!(age_in_months(date("2026-01-31"), date("2026-03-31")), Ok(2));
    }

    #[test]
    fn test_future_birth_date_rejected() {
        let err = age_in_months(date("2026-05-11"), date("2026-05-10")).unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidDate { .. }));
    }
}
