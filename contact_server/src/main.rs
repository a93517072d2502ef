//! Main entry point for the contact page server binary

use anyhow::Result;
use contact_core::{connect_backend, create_app_with_config, run_server, AppConfig, AppState};
use std::net::SocketAddr;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = AppConfig::load()
        .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;

    info!("Configuration loaded successfully");
    info!("Server will bind to: {}", config.bind_address());
    info!("Backend: {}", config.backend.kind);

    let addr: SocketAddr = config.bind_address().parse()
        .map_err(|e| anyhow::anyhow!("Invalid bind address: {}", e))?;

    let backend = connect_backend(&config.backend).await
        .map_err(|e| anyhow::anyhow!("Failed to initialize {} backend: {}", config.backend.kind, e))?;

    if let Err(e) = backend.health_check().await {
        tracing::warn!("Backend is not reachable yet: {}", e);
    }

    let state = AppState::new(backend).with_page(config.page.clone());
    let app = create_app_with_config(state, &config);

    info!("Contact page available at http://{}/contact", addr);

    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    run_server(app, addr, shutdown_timeout).await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    info!("Server shut down gracefully");
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            let default_level = if cfg!(debug_assertions) {
                "debug"
            } else {
                "info"
            };

            format!(
                "{}={level},contact_core={level},tower_http=debug",
                env!("CARGO_CRATE_NAME").replace('-', "_"),
                level = default_level
            ).into()
        });

    let fmt_layer = fmt::layer()
        .with_target(true)
        .with_file(true)
        .with_line_number(true);

    let is_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    if is_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.pretty())
            .init();
    }
}
