//! Records sent to the backend store, one per form

use crate::backend::Table;
use crate::validation::rules::{validate_calendar_date, validate_time_of_day};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use validator::Validate;

/// A row the page knows how to insert.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync {
    const TABLE: Table;
}

/// Consultation booking from the "Schedule a Consultation" card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct AppointmentRequest {
    #[validate(custom(function = "validate_calendar_date", message = "Date must be in YYYY-MM-DD format"))]
    pub date: String,

    #[validate(custom(function = "validate_time_of_day", message = "Time must be in 24-hour HH:mm format"))]
    pub time: String,

    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
}

impl Record for AppointmentRequest {
    const TABLE: Table = Table::Appointments;
}

impl AppointmentRequest {
    pub fn is_complete(&self) -> bool {
        !self.date.is_empty() && !self.time.is_empty() && !self.name.is_empty() && !self.email.is_empty()
    }
}

/// Free-form message from the "Send Message" card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactMessage {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl Record for ContactMessage {
    const TABLE: Table = Table::Contacts;
}
