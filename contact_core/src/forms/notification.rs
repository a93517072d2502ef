use serde::{Deserialize, Serialize};

/// One-shot alert shown to the visitor after a submit attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    AppointmentSent,
    AppointmentFailed,
    MessageSent,
    /// The store refused the message; carries its error text.
    MessageFailed { detail: String },
    MessageUnexpected,
    SubmissionInProgress,
}

impl Notification {
    pub fn message(&self) -> String {
        match self {
            Notification::AppointmentSent => "Appointment request sent!".to_string(),
            Notification::AppointmentFailed => "Failed to send appointment request.".to_string(),
            Notification::MessageSent => "Message sent!".to_string(),
            Notification::MessageFailed { detail } => format!("Failed to send message: {}", detail),
            Notification::MessageUnexpected => {
                "An unexpected error occurred while sending the message.".to_string()
            }
            Notification::SubmissionInProgress => "A submission is already in progress.".to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Notification::AppointmentSent => "appointment_sent",
            Notification::AppointmentFailed => "appointment_failed",
            Notification::MessageSent => "message_sent",
            Notification::MessageFailed { .. } => "message_failed",
            Notification::MessageUnexpected => "message_unexpected",
            Notification::SubmissionInProgress => "submission_in_progress",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notification::AppointmentSent | Notification::MessageSent)
    }

    pub fn view(&self) -> NotificationView {
        NotificationView {
            kind: self.kind().to_string(),
            message: self.message(),
            success: self.is_success(),
        }
    }
}

impl std::fmt::Display for Notification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationView {
    pub kind: String,
    pub message: String,
    pub success: bool,
}
