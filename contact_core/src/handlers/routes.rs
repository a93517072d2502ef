//! Route table for the contact service

use super::{api, contact, health};
use crate::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn create_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(contact::handle_contact_page))
        .route("/contact", get(contact::handle_contact_page))
        .route("/contact/appointment", post(contact::handle_appointment_form))
        .route("/contact/message", post(contact::handle_contact_form))
        .route("/api/appointments", post(api::handle_create_appointment))
        .route("/api/contacts", post(api::handle_create_contact))
        .route("/api/faqs", get(api::handle_faqs))
        .route("/health", get(health::handle_health))
        .route("/ready", get(health::handle_readiness))
        .route("/live", get(health::handle_liveness))
}
