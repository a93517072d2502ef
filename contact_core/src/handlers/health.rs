//! Health check handlers

use crate::{models::ApiResponse, AppState};
use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::time::Instant;
use tracing::{info, warn};

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    let started = Instant::now();
    let backend_check = state.backend.health_check().await;
    let response_time_ms = started.elapsed().as_millis() as u64;

    let mut health_info = serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().timestamp(),
        "app": state.app_name,
        "version": state.version,
        "uptime_seconds": (chrono::Utc::now() - state.started_at).num_seconds(),
        "backend": {
            "name": state.backend.name(),
            "status": "healthy",
            "response_time_ms": response_time_ms,
        },
        "submissions_in_flight": state.guard.in_flight(),
    });

    if let Err(e) = backend_check {
        warn!("Backend health check failed: {}", e);
        health_info["status"] = serde_json::Value::String("degraded".to_string());
        health_info["backend"]["status"] = serde_json::Value::String("unhealthy".to_string());
        health_info["backend"]["error"] = serde_json::Value::String(e.to_string());
    }

    Json(ApiResponse::success(health_info))
}

pub async fn handle_readiness(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /ready - Readiness probe");

    match state.backend.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(serde_json::json!({
                "status": "ready",
                "timestamp": chrono::Utc::now().timestamp()
            }))),
        ),
        Err(e) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiResponse::error(format!("Service not ready: backend_unavailable ({})", e))),
        ),
    }
}

pub async fn handle_liveness() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::success(serde_json::json!({
            "status": "alive",
            "timestamp": chrono::Utc::now().timestamp()
        }))),
    )
}
