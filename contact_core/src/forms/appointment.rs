use super::{Notification, Submission, SubmissionGuard};
use crate::backend::{InsertBackend, Table};
use crate::error::Result;
use crate::models::{AppointmentPayload, AppointmentRequest};
use crate::validation::{is_valid_time, ContextValidatable, ValidationContext, ValidationResult};
use chrono::NaiveDate;
use tracing::{debug, info, warn};

/// State behind the "Schedule a Consultation" card.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentForm {
    fields: AppointmentRequest,
    today: NaiveDate,
}

impl AppointmentForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            fields: AppointmentRequest::default(),
            today,
        }
    }

    /// Replays submitted values through the field setters, so an invalid
    /// time is dropped exactly as it would be while typing.
    pub fn with_input(today: NaiveDate, input: &AppointmentPayload) -> Self {
        let mut form = Self::new(today);
        form.set_name(input.name.clone());
        form.set_email(input.email.clone());
        form.set_date(input.date.clone());
        form.set_time(&input.time);
        form
    }

    pub fn fields(&self) -> &AppointmentRequest {
        &self.fields
    }

    pub fn set_name(&mut self, value: impl Into<String>) {
        self.fields.name = value.into();
    }

    pub fn set_email(&mut self, value: impl Into<String>) {
        self.fields.email = value.into();
    }

    pub fn set_date(&mut self, value: impl Into<String>) {
        self.fields.date = value.into();
    }

    /// Commits `value` if it is empty or a 24-hour `HH:mm` time. Anything
    /// else leaves the stored time untouched and returns `false`.
    pub fn set_time(&mut self, value: &str) -> bool {
        if value.is_empty() || is_valid_time(value) {
            self.fields.time = value.to_string();
            true
        } else {
            debug!(rejected = value, "discarding time input");
            false
        }
    }

    /// Earliest date the date picker offers.
    pub fn min_date(&self) -> NaiveDate {
        self.today
    }

    pub fn submit_enabled(&self) -> bool {
        self.fields.is_complete()
    }

    pub fn clear(&mut self) {
        self.fields = AppointmentRequest::default();
    }

    fn missing_fields(&self) -> ValidationResult {
        let mut result = ValidationResult::success();
        let fields = [
            ("name", &self.fields.name),
            ("email", &self.fields.email),
            ("date", &self.fields.date),
            ("time", &self.fields.time),
        ];
        for (field, value) in fields {
            if value.is_empty() {
                result.add_error(field, "This field is required");
            }
        }
        result
    }

    /// Sends the booking as one insert into `appointments`.
    ///
    /// A backend-reported error yields the generic failure notice and keeps
    /// the fields. A failed call is not handled here and comes back as `Err`.
    pub async fn submit(
        &mut self,
        backend: &dyn InsertBackend,
        guard: &SubmissionGuard,
    ) -> Result<Submission> {
        if !self.submit_enabled() {
            debug!("appointment submit blocked: required fields missing");
            return Ok(Submission::Blocked(self.missing_fields()));
        }

        let checks = self
            .fields
            .validate_with_context(&ValidationContext::new(self.today));
        if !checks.is_valid {
            debug!(errors = ?checks.errors, "appointment submit blocked by field checks");
            return Ok(Submission::Blocked(checks));
        }

        let Some(_in_flight) = guard.try_begin(&self.fields)? else {
            warn!("duplicate appointment submission while the first is in flight");
            return Ok(Submission::Completed(Notification::SubmissionInProgress));
        };

        let row = serde_json::to_value(&self.fields)?;
        let response = backend.insert(Table::Appointments, vec![row]).await?;

        match response.error {
            None => {
                info!(date = %self.fields.date, time = %self.fields.time, "appointment request stored");
                self.clear();
                Ok(Submission::Completed(Notification::AppointmentSent))
            }
            Some(error) => {
                warn!(error = %error, "appointment insert rejected");
                Ok(Submission::Completed(Notification::AppointmentFailed))
            }
        }
    }
}
