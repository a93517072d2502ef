use super::{Notification, SubmissionGuard};
use crate::backend::{InsertBackend, Table};
use crate::error::Result;
use crate::models::{ContactMessage, ContactPayload};
use tracing::{error, info, warn};

/// State behind the "Send Message" card. Nothing gates a submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContactForm {
    fields: ContactMessage,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_input(input: &ContactPayload) -> Self {
        let mut form = Self::new();
        form.set_first_name(input.first_name.clone());
        form.set_last_name(input.last_name.clone());
        form.set_email(input.email.clone());
        form.set_subject(input.subject.clone());
        form.set_message(input.message.clone());
        form
    }

    pub fn fields(&self) -> &ContactMessage {
        &self.fields
    }

    pub fn set_first_name(&mut self, value: impl Into<String>) {
        self.fields.first_name = value.into();
    }

    pub fn set_last_name(&mut self, value: impl Into<String>) {
        self.fields.last_name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.fields.email = value.into();
    }

    pub fn set_subject(&mut self, value: impl Into<String>) {
        self.fields.subject = value.into();
    }

    pub fn set_message(&mut self, value: impl Into<String>) {
        self.fields.message = value.into();
    }

    pub fn clear(&mut self) {
        self.fields = ContactMessage::default();
    }

    /// Sends the message as one insert into `contacts`. Every failure,
    /// including a failed call, ends in a notification with fields kept.
    pub async fn submit(&mut self, backend: &dyn InsertBackend, guard: &SubmissionGuard) -> Notification {
        info!(
            email = %self.fields.email,
            subject = %self.fields.subject,
            "attempting to send contact message"
        );

        match self.try_submit(backend, guard).await {
            Ok(notification) => notification,
            Err(err) => {
                error!("unexpected error while sending contact message: {}", err);
                Notification::MessageUnexpected
            }
        }
    }

    async fn try_submit(&mut self, backend: &dyn InsertBackend, guard: &SubmissionGuard) -> Result<Notification> {
        let Some(_in_flight) = guard.try_begin(&self.fields)? else {
            warn!("duplicate contact submission while the first is in flight");
            return Ok(Notification::SubmissionInProgress);
        };

        let row = serde_json::to_value(&self.fields)?;
        let response = backend.insert(Table::Contacts, vec![row]).await?;

        if let Some(error) = response.error {
            error!(error = %error, "contact insert rejected");
            return Ok(Notification::MessageFailed { detail: error.message });
        }

        info!(rows = response.data.as_ref().map(Vec::len).unwrap_or(0), "contact message sent");
        self.clear();
        Ok(Notification::MessageSent)
    }
}
