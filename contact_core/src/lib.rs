//! Core library for the LMS contact page service: form state, backend
//! inserts, page rendering and the HTTP routes that tie them together.

pub mod backend;
pub mod config;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod page;
pub mod validation;

pub use backend::{
    connect_backend, InsertBackend, InsertResponse, MemoryBackend, RestBackend, SharedBackend,
    SqliteBackend, Table,
};
pub use crate::config::AppConfig;
pub use error::{AppError, Result};
pub use forms::{AppointmentForm, ContactForm, Notification, Submission, SubmissionGuard};
pub use handlers::create_routes;
pub use middleware::rate_limit::RateLimiter;

use axum::{middleware as axum_middleware, Router};
use chrono::{DateTime, NaiveDate, Utc};
use crate::config::PageConfig;
use std::future::{Future, IntoFuture};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{signal, sync::oneshot};
use tower_http::timeout::TimeoutLayer;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub app_name: String,
    pub version: String,
    pub backend: SharedBackend,
    pub guard: SubmissionGuard,
    pub page: PageConfig,
    pub started_at: DateTime<Utc>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(Arc::new(MemoryBackend::new()))
    }
}

impl AppState {
    pub fn new(backend: SharedBackend) -> Self {
        Self {
            app_name: "LMS Contact Service".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            backend,
            guard: SubmissionGuard::new(),
            page: PageConfig::default(),
            started_at: Utc::now(),
        }
    }

    pub fn with_page(mut self, page: PageConfig) -> Self {
        self.page = page;
        self
    }

    /// Date the page treats as "today" for the date picker minimum. This is
    /// the UTC calendar date, whatever the server's timezone.
    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }
}

pub fn create_app(state: AppState) -> Router {
    create_app_with_config(state, &AppConfig::default())
}

pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new().merge(create_routes());

    router = router.layer(TimeoutLayer::new(Duration::from_secs(
        config.server.request_timeout_seconds,
    )));
    router = router.layer(middleware::cors::cors_layer_from_config(&config.cors));

    if config.rate_limit.enable {
        router = router.layer(axum_middleware::from_fn_with_state(
            RateLimiter::new(&config.rate_limit),
            middleware::rate_limit::rate_limit_middleware,
        ));
    }

    router = router.layer(middleware::logging::logging_layer());

    router.with_state(state)
}

/// Serves until a shutdown signal arrives, then gives open connections
/// `shutdown_timeout` to finish before dropping them.
pub async fn run_server(app: Router, addr: SocketAddr, shutdown_timeout: Duration) -> Result<()> {
    info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    let app = app.into_make_service_with_connect_info::<SocketAddr>();

    let (draining_tx, draining_rx) = oneshot::channel();
    let serve = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = draining_tx.send(());
        })
        .into_future();

    serve_until_drained(serve, draining_rx, shutdown_timeout).await
}

async fn serve_until_drained<F>(
    serve: F,
    draining: oneshot::Receiver<()>,
    shutdown_timeout: Duration,
) -> Result<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    tokio::pin!(serve);

    tokio::select! {
        result = &mut serve => return Ok(result?),
        _ = draining => {}
    }

    match tokio::time::timeout(shutdown_timeout, &mut serve).await {
        Ok(result) => Ok(result?),
        Err(_) => {
            warn!(
                "Connections still open after {:?}; shutting down anyway",
                shutdown_timeout
            );
            Ok(())
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
