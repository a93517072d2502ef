//! Request and response models

use crate::forms::NotificationView;
use crate::validation::ValidationResult;
use serde::{Deserialize, Serialize};

/// Raw appointment field values as typed by the visitor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentPayload {
    pub name: String,
    pub email: String,
    pub date: String,
    pub time: String,
}

/// Raw contact field values as typed by the visitor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactPayload {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

/// Form state after a submit attempt.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionView<T> {
    pub notification: Option<NotificationView>,
    pub validation: Option<ValidationResult>,
    pub fields: T,
    pub submit_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
        }
    }

    pub fn with_data(success: bool, data: T, message: Option<String>) -> Self {
        Self {
            success,
            data: Some(data),
            message,
        }
    }
}
