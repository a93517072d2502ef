//! The HTML page and its two form posts

use crate::{
    error::Result,
    forms::{AppointmentForm, ContactForm, Notification, Submission},
    models::{AppointmentPayload, ContactPayload},
    page::{render_contact_page, PageView},
    validation::ValidationResult,
    AppState,
};
use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse},
};
use tracing::info;

fn render_page(
    state: &AppState,
    appointment: &AppointmentForm,
    contact: &ContactForm,
    notification: Option<&Notification>,
    appointment_errors: Option<&ValidationResult>,
) -> Html<String> {
    Html(render_contact_page(&PageView {
        product_name: &state.page.product_name,
        faq_url: &state.page.faq_url,
        appointment,
        contact,
        notification,
        appointment_errors,
    }))
}

pub async fn handle_contact_page(State(state): State<AppState>) -> impl IntoResponse {
    render_page(
        &state,
        &AppointmentForm::new(state.today()),
        &ContactForm::new(),
        None,
        None,
    )
}

pub async fn handle_appointment_form(
    State(state): State<AppState>,
    Form(payload): Form<AppointmentPayload>,
) -> Result<impl IntoResponse> {
    info!("POST /contact/appointment");

    let mut form = AppointmentForm::with_input(state.today(), &payload);
    let submission = form.submit(state.backend.as_ref(), &state.guard).await?;

    let response = match &submission {
        Submission::Blocked(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            render_page(&state, &form, &ContactForm::new(), None, Some(errors)),
        ),
        Submission::Completed(notification) => (
            StatusCode::OK,
            render_page(&state, &form, &ContactForm::new(), Some(notification), None),
        ),
    };

    Ok(response)
}

pub async fn handle_contact_form(
    State(state): State<AppState>,
    Form(payload): Form<ContactPayload>,
) -> impl IntoResponse {
    info!("POST /contact/message");

    let mut form = ContactForm::with_input(&payload);
    let notification = form.submit(state.backend.as_ref(), &state.guard).await;

    render_page(
        &state,
        &AppointmentForm::new(state.today()),
        &form,
        Some(&notification),
        None,
    )
}
