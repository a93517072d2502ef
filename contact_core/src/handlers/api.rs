//! JSON endpoints for the same two forms, plus the FAQ list

use crate::{
    error::Result,
    forms::{AppointmentForm, ContactForm, Notification, Submission},
    models::{ApiResponse, AppointmentPayload, ContactPayload, SubmissionView},
    page::FAQS,
    AppState,
};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

fn status_for(notification: &Notification) -> StatusCode {
    match notification {
        Notification::AppointmentSent | Notification::MessageSent => StatusCode::CREATED,
        Notification::SubmissionInProgress => StatusCode::CONFLICT,
        Notification::AppointmentFailed
        | Notification::MessageFailed { .. }
        | Notification::MessageUnexpected => StatusCode::BAD_GATEWAY,
    }
}

pub async fn handle_create_appointment(
    State(state): State<AppState>,
    Json(payload): Json<AppointmentPayload>,
) -> Result<impl IntoResponse> {
    info!("POST /api/appointments");

    let mut form = AppointmentForm::with_input(state.today(), &payload);
    let submission = form.submit(state.backend.as_ref(), &state.guard).await?;

    let (status, notification, validation) = match submission {
        Submission::Blocked(errors) => (StatusCode::UNPROCESSABLE_ENTITY, None, Some(errors)),
        Submission::Completed(notification) => (status_for(&notification), Some(notification), None),
    };

    let message = match (&notification, &validation) {
        (Some(notification), _) => Some(notification.message()),
        (None, Some(errors)) => Some(errors.summary()),
        (None, None) => None,
    };
    let success = notification.as_ref().is_some_and(Notification::is_success);

    let view = SubmissionView {
        notification: notification.as_ref().map(Notification::view),
        validation,
        submit_enabled: form.submit_enabled(),
        fields: form.fields().clone(),
    };

    Ok((status, Json(ApiResponse::with_data(success, view, message))))
}

pub async fn handle_create_contact(
    State(state): State<AppState>,
    Json(payload): Json<ContactPayload>,
) -> impl IntoResponse {
    info!("POST /api/contacts");

    let mut form = ContactForm::with_input(&payload);
    let notification = form.submit(state.backend.as_ref(), &state.guard).await;

    let view = SubmissionView {
        notification: Some(notification.view()),
        validation: None,
        submit_enabled: true,
        fields: form.fields().clone(),
    };

    (
        status_for(&notification),
        Json(ApiResponse::with_data(notification.is_success(), view, Some(notification.message()))),
    )
}

pub async fn handle_faqs(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::success(serde_json::json!({
        "faqs": FAQS,
        "count": FAQS.len(),
        "more_url": state.page.faq_url,
    })))
}
