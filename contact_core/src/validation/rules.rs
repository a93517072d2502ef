//! Validation rules and custom validators

use chrono::NaiveDate;
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

lazy_static! {
    static ref TIME_REGEX: Regex = Regex::new(
        r"^([0-1]?[0-9]|2[0-3]):[0-5][0-9]$"
    ).unwrap();

    static ref DATE_REGEX: Regex = Regex::new(
        r"^\d{4}-\d{2}-\d{2}$"
    ).unwrap();
}

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 24-hour `HH:mm`; the hour may drop its leading zero.
pub fn is_valid_time(value: &str) -> bool {
    TIME_REGEX.is_match(value)
}

pub fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    if !DATE_REGEX.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, DATE_FORMAT).ok()
}

pub fn validate_time_of_day(value: &str) -> Result<(), ValidationError> {
    if is_valid_time(value) {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_time"))
    }
}

pub fn validate_calendar_date(value: &str) -> Result<(), ValidationError> {
    match parse_calendar_date(value) {
        Some(_) => Ok(()),
        None => Err(ValidationError::new("invalid_date")),
    }
}

pub fn validate_not_before(value: &str, min: NaiveDate) -> Result<(), ValidationError> {
    match parse_calendar_date(value) {
        Some(date) if date >= min => Ok(()),
        Some(_) => Err(ValidationError::new("date_in_past")),
        None => Err(ValidationError::new("invalid_date")),
    }
}
