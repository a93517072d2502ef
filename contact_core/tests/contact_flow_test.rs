use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use contact_core::{
    backend::BackendError, create_app, create_app_with_config, AppConfig, AppError, AppState,
    InsertBackend, InsertResponse, MemoryBackend, Result, Table,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

struct RejectingBackend;

#[async_trait]
impl InsertBackend for RejectingBackend {
    fn name(&self) -> &'static str {
        "rejecting"
    }

    async fn insert(&self, _table: Table, _rows: Vec<Value>) -> Result<InsertResponse> {
        Ok(InsertResponse::failed(BackendError::new("permission denied for table")))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

struct UnreachableBackend;

#[async_trait]
impl InsertBackend for UnreachableBackend {
    fn name(&self) -> &'static str {
        "unreachable"
    }

    async fn insert(&self, _table: Table, _rows: Vec<Value>) -> Result<InsertResponse> {
        Err(AppError::Upstream("connection refused".to_string()))
    }

    async fn health_check(&self) -> Result<()> {
        Err(AppError::Upstream("connection refused".to_string()))
    }
}

struct SlowBackend {
    inner: MemoryBackend,
}

#[async_trait]
impl InsertBackend for SlowBackend {
    fn name(&self) -> &'static str {
        "slow"
    }

    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<InsertResponse> {
        tokio::time::sleep(Duration::from_millis(200)).await;
        self.inner.insert(table, rows).await
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

struct StalledBackend;

#[async_trait]
impl InsertBackend for StalledBackend {
    fn name(&self) -> &'static str {
        "stalled"
    }

    async fn insert(&self, _table: Table, _rows: Vec<Value>) -> Result<InsertResponse> {
        tokio::time::sleep(Duration::from_secs(5)).await;
        Ok(InsertResponse::inserted(Vec::new()))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

fn app_with(backend: Arc<dyn InsertBackend>) -> Router {
    create_app(AppState::new(backend))
}

fn upcoming_date() -> String {
    (chrono::Utc::now().date_naive() + chrono::Duration::days(7))
        .format("%Y-%m-%d")
        .to_string()
}

fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn form_request(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(body))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn appointment_body() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "date": upcoming_date(),
        "time": "14:30"
    })
}

fn contact_body() -> Value {
    json!({
        "first_name": "Grace",
        "last_name": "Hopper",
        "email": "grace@example.com",
        "subject": "Integrations",
        "message": "Do you support LTI?"
    })
}

#[tokio::test]
async fn test_contact_page_renders() {
    let app = app_with(Arc::new(MemoryBackend::new()));

    let request = Request::builder().uri("/contact").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Schedule a Consultation"));
    assert!(html.contains("View all FAQs"));
    assert_eq!(html.matches(r#"<div class="faq">"#).count(), 4);
}

#[tokio::test]
async fn test_appointment_form_post_clears_fields_on_success() {
    let backend = MemoryBackend::new();
    let app = app_with(Arc::new(backend.clone()));

    let body = format!(
        "name=Ada+Lovelace&email=ada%40example.com&date={}&time=14%3A30",
        upcoming_date()
    );
    let response = app.oneshot(form_request("/contact/appointment", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains(r#"data-kind="appointment_sent""#));
    assert!(html.contains("Appointment request sent!"));
    assert!(!html.contains(r#"value="Ada Lovelace""#));
    assert_eq!(backend.count(Table::Appointments), 1);
}

#[tokio::test]
async fn test_appointment_form_post_with_bad_time_sends_nothing() {
    let backend = MemoryBackend::new();
    let app = app_with(Arc::new(backend.clone()));

    let body = format!(
        "name=Ada+Lovelace&email=ada%40example.com&date={}&time=25%3A00",
        upcoming_date()
    );
    let response = app.oneshot(form_request("/contact/appointment", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = body_text(response).await;
    assert!(html.contains(r#"value="Ada Lovelace""#));
    assert!(html.contains(r#"data-submit-enabled="false" disabled>"#));
    assert!(!html.contains("<dialog"));
    assert_eq!(backend.count(Table::Appointments), 0);
}

#[tokio::test]
async fn test_contact_form_post_keeps_fields_on_rejection() {
    let app = app_with(Arc::new(RejectingBackend));

    let body = "first_name=Grace&last_name=Hopper&email=grace%40example.com&subject=Hi&message=Hello".to_string();
    let response = app.oneshot(form_request("/contact/message", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("Failed to send message: permission denied for table"));
    assert!(html.contains(r#"value="Grace""#));
    assert!(html.contains(r#"value="Hopper""#));
}

#[tokio::test]
async fn test_api_appointment_success() {
    let backend = MemoryBackend::new();
    let app = app_with(Arc::new(backend.clone()));

    let response = app.oneshot(json_request("/api/appointments", appointment_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Appointment request sent!");
    assert_eq!(body["data"]["notification"]["kind"], "appointment_sent");
    assert_eq!(body["data"]["fields"]["name"], "");
    assert_eq!(body["data"]["submit_enabled"], false);
    assert_eq!(backend.count(Table::Appointments), 1);
}

#[tokio::test]
async fn test_api_appointment_missing_field_is_blocked() {
    let backend = MemoryBackend::new();
    let app = app_with(Arc::new(backend.clone()));

    let mut payload = appointment_body();
    payload["email"] = json!("");
    let response = app.oneshot(json_request("/api/appointments", payload)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["data"]["notification"].is_null());
    assert_eq!(body["data"]["validation"]["errors"]["email"][0], "This field is required");
    assert_eq!(body["data"]["fields"]["name"], "Ada Lovelace");
    assert_eq!(backend.count(Table::Appointments), 0);
}

#[tokio::test]
async fn test_api_appointment_rejection_keeps_fields() {
    let app = app_with(Arc::new(RejectingBackend));

    let response = app.oneshot(json_request("/api/appointments", appointment_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Failed to send appointment request.");
    assert_eq!(body["data"]["fields"]["email"], "ada@example.com");
    assert_eq!(body["data"]["fields"]["time"], "14:30");
}

#[tokio::test]
async fn test_api_appointment_transport_failure_is_an_error_response() {
    let app = app_with(Arc::new(UnreachableBackend));

    let response = app.oneshot(json_request("/api/appointments", appointment_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Data store unavailable");
}

#[tokio::test]
async fn test_api_contact_transport_failure_is_generic() {
    let app = app_with(Arc::new(UnreachableBackend));

    let response = app.oneshot(json_request("/api/contacts", contact_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["message"], "An unexpected error occurred while sending the message.");
    assert_eq!(body["data"]["notification"]["kind"], "message_unexpected");
    assert_eq!(body["data"]["fields"]["first_name"], "Grace");
    assert_eq!(body["data"]["fields"]["message"], "Do you support LTI?");
}

#[tokio::test]
async fn test_api_contact_accepts_empty_message() {
    let backend = MemoryBackend::new();
    let app = app_with(Arc::new(backend.clone()));

    let response = app.oneshot(json_request("/api/contacts", json!({}))).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(backend.count(Table::Contacts), 1);
}

#[tokio::test]
async fn test_duplicate_in_flight_submission_is_refused() {
    let backend = MemoryBackend::new();
    let app = app_with(Arc::new(SlowBackend { inner: backend.clone() }));

    let first = app.clone().oneshot(json_request("/api/contacts", contact_body()));
    let second = app.oneshot(json_request("/api/contacts", contact_body()));
    let (first, second) = futures_util::future::join(first, second).await;

    let mut statuses = vec![first.unwrap().status(), second.unwrap().status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::CREATED, StatusCode::CONFLICT]);
    assert_eq!(backend.count(Table::Contacts), 1);
}

#[tokio::test]
async fn test_stalled_submission_times_out_and_frees_guard() {
    let mut config = AppConfig::default();
    config.server.request_timeout_seconds = 1;

    let state = AppState::new(Arc::new(StalledBackend));
    let app = create_app_with_config(state.clone(), &config);

    let response = app.oneshot(json_request("/api/contacts", contact_body())).await.unwrap();

    assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    assert_eq!(state.guard.in_flight(), 0);
}

#[tokio::test]
async fn test_faq_endpoint() {
    let app = app_with(Arc::new(MemoryBackend::new()));

    let request = Request::builder().uri("/api/faqs").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["count"], 4);
    assert_eq!(
        body["data"]["faqs"][1]["question"],
        "What kind of support do you offer to customers?"
    );
    assert_eq!(body["data"]["more_url"], "/faqs");
}

#[tokio::test]
async fn test_health_reports_unreachable_backend() {
    let app = app_with(Arc::new(UnreachableBackend));

    let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["data"]["status"], "degraded");
    assert_eq!(body["data"]["backend"]["status"], "unhealthy");

    let request = Request::builder().uri("/ready").body(Body::empty()).unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
