//! Input validation for form submissions

pub mod rules;

pub use rules::{is_valid_time, parse_calendar_date};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use validator::{Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: BTreeMap<String, Vec<String>>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            is_valid: true,
            errors: BTreeMap::new(),
        }
    }

    pub fn from_validation_errors(errors: ValidationErrors) -> Self {
        let mut result = Self::success();

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = match &error.message {
                    Some(message) => message.to_string(),
                    None => format!("Validation failed for field '{}'", field),
                };
                result.add_error(&field, &message);
            }
        }

        result
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.is_valid = false;
        let messages = self.errors.entry(field.to_string()).or_default();
        if !messages.iter().any(|m| m == message) {
            messages.push(message.to_string());
        }
    }

    pub fn merge(&mut self, other: ValidationResult) {
        for (field, messages) in other.errors {
            for message in messages {
                self.add_error(&field, &message);
            }
        }
    }

    pub fn summary(&self) -> String {
        self.errors
            .values()
            .flatten()
            .cloned()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

pub trait Validatable {
    fn validate_comprehensive(&self) -> ValidationResult;
}

impl<T> Validatable for T
where
    T: Validate,
{
    fn validate_comprehensive(&self) -> ValidationResult {
        match self.validate() {
            Ok(_) => ValidationResult::success(),
            Err(errors) => ValidationResult::from_validation_errors(errors),
        }
    }
}

/// Request-time facts some rules depend on.
#[derive(Debug, Clone)]
pub struct ValidationContext {
    pub today: NaiveDate,
}

impl ValidationContext {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

pub trait ContextValidatable {
    fn validate_with_context(&self, context: &ValidationContext) -> ValidationResult;
}

impl ContextValidatable for crate::models::AppointmentRequest {
    fn validate_with_context(&self, context: &ValidationContext) -> ValidationResult {
        let mut result = self.validate_comprehensive();

        if rules::parse_calendar_date(&self.date).is_some()
            && rules::validate_not_before(&self.date, context.today).is_err()
        {
            result.add_error("date", "Please choose today or a later date");
        }

        result
    }
}
