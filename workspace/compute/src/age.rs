use chrono::{Datelike, NaiveDate};

use crate::error::{ComputeError, Result};

/// Parses a stored `YYYY-MM-DD` date of birth.
pub fn parse_date_of_birth(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ComputeError::InvalidDateOfBirth(raw.to_string()))
}

/// Returns the age in whole years on `today`.
///
/// The year difference is reduced by one until the birthday has been reached
/// in the current year.
pub fn calculate_age(date_of_birth: NaiveDate, today: NaiveDate) -> i64 {
    let years = i64::from(today.year() - date_of_birth.year());
    let before_birthday = (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day());
    years - i64::from(before_birthday)
}
