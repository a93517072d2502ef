//! Controlled form state and submission for the two cards on the page

pub mod appointment;
pub mod contact;
pub mod guard;
pub mod notification;

pub use appointment::AppointmentForm;
pub use contact::ContactForm;
pub use guard::{InFlight, SubmissionGuard};
pub use notification::{Notification, NotificationView};

use crate::validation::ValidationResult;

/// What a submit attempt amounted to.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Nothing was sent.
    Blocked(ValidationResult),
    Completed(Notification),
}

impl Submission {
    pub fn notification(&self) -> Option<&Notification> {
        match self {
            Submission::Blocked(_) => None,
            Submission::Completed(notification) => Some(notification),
        }
    }
}
