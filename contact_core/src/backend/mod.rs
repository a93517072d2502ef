//! The insert interface to the data store that owns submitted records.
//!
//! A call has two failure channels. A store that received the request and
//! refused it answers with an [`InsertResponse`] carrying a [`BackendError`].
//! A call that never got an answer (connection refused, broken pool,
//! undecodable reply) returns `Err`.

pub mod memory;
pub mod migrations;
pub mod rest;
pub mod sqlite;

pub use memory::MemoryBackend;
pub use migrations::run_migrations;
pub use rest::RestBackend;
pub use sqlite::{get_database_pool, SqliteBackend};

use crate::config::{BackendConfig, BackendKind};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Table {
    Appointments,
    Contacts,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Appointments => "appointments",
            Table::Contacts => "contacts",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error descriptor reported by the store itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
            details: None,
            hint: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} ({})", self.message, code),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsertResponse {
    pub data: Option<Vec<Value>>,
    pub error: Option<BackendError>,
}

impl InsertResponse {
    pub fn inserted(rows: Vec<Value>) -> Self {
        Self {
            data: Some(rows),
            error: None,
        }
    }

    pub fn failed(error: BackendError) -> Self {
        Self {
            data: None,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

#[async_trait]
pub trait InsertBackend: Send + Sync {
    fn name(&self) -> &'static str;

    /// Append `rows` to `table`. One call, no retries.
    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<InsertResponse>;

    async fn health_check(&self) -> Result<()>;
}

pub type SharedBackend = Arc<dyn InsertBackend>;

/// Builds the backend selected by configuration. SQLite databases are
/// migrated before use.
pub async fn connect_backend(config: &BackendConfig) -> Result<SharedBackend> {
    let backend: SharedBackend = match config.kind {
        BackendKind::Memory => {
            info!("Using in-memory backend; submissions are lost on restart");
            Arc::new(MemoryBackend::new())
        }
        BackendKind::Sqlite => {
            let pool = get_database_pool(&config.database_url, config.max_connections).await?;
            run_migrations(pool.clone()).await?;
            Arc::new(SqliteBackend::new(pool))
        }
        BackendKind::Rest => {
            info!("Using hosted store at {}", config.rest_url);
            Arc::new(RestBackend::from_config(config)?)
        }
    };

    Ok(backend)
}
