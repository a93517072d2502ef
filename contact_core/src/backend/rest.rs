//! Hosted store reached over its PostgREST-style HTTP API

use super::{BackendError, InsertBackend, InsertResponse, Table};
use crate::config::BackendConfig;
use crate::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct RestBackend {
    client: Client,
    base_url: String,
    api_key: String,
}

impl RestBackend {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(AppError::from)?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &BackendConfig) -> Result<Self> {
        Self::new(
            config.rest_url.clone(),
            config.api_key.clone(),
            Duration::from_secs(config.request_timeout_seconds),
        )
    }

    fn table_url(&self, table: Table) -> String {
        format!("{}/rest/v1/{}", self.base_url, table.name())
    }
}

/// Turn a non-2xx reply into the store's error descriptor, falling back to
/// the status line when the body is not the expected shape.
fn decode_error(status: StatusCode, body: &str) -> BackendError {
    match serde_json::from_str::<BackendError>(body) {
        Ok(error) => error,
        Err(_) => {
            let reason = status.canonical_reason().unwrap_or("Unknown status");
            BackendError::new(format!("{} {}", status.as_u16(), reason)).with_code(status.as_u16().to_string())
        }
    }
}

#[async_trait]
impl InsertBackend for RestBackend {
    fn name(&self) -> &'static str {
        "rest"
    }

    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<InsertResponse> {
        let url = self.table_url(table);
        debug!(table = %table, rows = rows.len(), "POST {}", url);

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header("Prefer", "return=representation")
            .json(&rows)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error = decode_error(status, &body);
            warn!(table = %table, status = status.as_u16(), error = %error, "insert rejected by store");
            return Ok(InsertResponse::failed(error));
        }

        if body.trim().is_empty() {
            return Ok(InsertResponse::inserted(Vec::new()));
        }

        let data: Vec<Value> = serde_json::from_str(&body)
            .map_err(|e| AppError::Upstream(format!("Undecodable insert response: {}", e)))?;

        Ok(InsertResponse::inserted(data))
    }

    async fn health_check(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/rest/v1/", self.base_url))
            .header("apikey", &self.api_key)
            .send()
            .await?;

        if response.status().is_server_error() {
            return Err(AppError::Upstream(format!(
                "Store health check returned {}",
                response.status()
            )));
        }

        Ok(())
    }
}
