use super::{BackendError, InsertBackend, InsertResponse, Table};
use crate::error::{AppError, Result};
use crate::models::{AppointmentRequest, ContactMessage};
use async_trait::async_trait;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Row, Sqlite, SqlitePool, Transaction};
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct SqliteBackend {
    pool: SqlitePool,
}

impl SqliteBackend {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn count(&self, table: Table) -> Result<i64> {
        let query = format!("SELECT COUNT(*) as count FROM {}", table.name());
        let row = sqlx::query(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row.try_get("count").unwrap_or(0))
    }

    async fn insert_row(
        tx: &mut Transaction<'_, Sqlite>,
        table: Table,
        row: Value,
    ) -> std::result::Result<Value, InsertFailure> {
        let inserted = match table {
            Table::Appointments => {
                let record: AppointmentRequest = decode_row(table, row)?;
                let stored = sqlx::query(
                    "INSERT INTO appointments (date, time, name, email) VALUES (?, ?, ?, ?) RETURNING id, created_at",
                )
                .bind(&record.date)
                .bind(&record.time)
                .bind(&record.name)
                .bind(&record.email)
                .fetch_one(&mut **tx)
                .await?;

                with_stored_columns(serde_json::to_value(&record), &stored)?
            }
            Table::Contacts => {
                let record: ContactMessage = decode_row(table, row)?;
                let stored = sqlx::query(
                    "INSERT INTO contacts (first_name, last_name, email, subject, message) VALUES (?, ?, ?, ?, ?) RETURNING id, created_at",
                )
                .bind(&record.first_name)
                .bind(&record.last_name)
                .bind(&record.email)
                .bind(&record.subject)
                .bind(&record.message)
                .fetch_one(&mut **tx)
                .await?;

                with_stored_columns(serde_json::to_value(&record), &stored)?
            }
        };

        Ok(inserted)
    }
}

/// Why a single row did not make it into the table.
enum InsertFailure {
    Rejected(BackendError),
    Transport(AppError),
}

impl From<sqlx::Error> for InsertFailure {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let mut rejected = BackendError::new(db_err.message());
                rejected.code = db_err.code().map(|code| code.to_string());
                InsertFailure::Rejected(rejected)
            }
            other => InsertFailure::Transport(AppError::from(other)),
        }
    }
}

fn decode_row<T: serde::de::DeserializeOwned>(
    table: Table,
    row: Value,
) -> std::result::Result<T, InsertFailure> {
    serde_json::from_value(row).map_err(|e| {
        let mut rejected = BackendError::new(format!("Invalid row for table '{}': {}", table, e));
        rejected.code = Some("PGRST204".to_string());
        InsertFailure::Rejected(rejected)
    })
}

fn with_stored_columns(
    record: serde_json::Result<Value>,
    stored: &sqlx::sqlite::SqliteRow,
) -> std::result::Result<Value, InsertFailure> {
    let mut value = record.map_err(|e| InsertFailure::Transport(AppError::from(e)))?;
    let id: i64 = stored.try_get("id").map_err(|e| InsertFailure::Transport(AppError::from(e)))?;
    let created_at: String = stored.try_get("created_at").unwrap_or_default();

    if let Value::Object(columns) = &mut value {
        columns.insert("id".to_string(), json!(id));
        columns.insert("created_at".to_string(), json!(created_at));
    }
    Ok(value)
}

#[async_trait]
impl InsertBackend for SqliteBackend {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<InsertResponse> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;
        let mut inserted = Vec::with_capacity(rows.len());

        for row in rows {
            match Self::insert_row(&mut tx, table, row).await {
                Ok(value) => inserted.push(value),
                Err(InsertFailure::Rejected(rejected)) => {
                    warn!(table = %table, error = %rejected, "insert rejected by database");
                    tx.rollback().await.map_err(AppError::from)?;
                    return Ok(InsertResponse::failed(rejected));
                }
                Err(InsertFailure::Transport(err)) => {
                    error!(table = %table, "insert failed: {}", err);
                    return Err(err);
                }
            }
        }

        tx.commit().await.map_err(AppError::from)?;
        Ok(InsertResponse::inserted(inserted))
    }

    async fn health_check(&self) -> Result<()> {
        let row = sqlx::query("SELECT 1 as test")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database health check failed: {}", e);
                AppError::from(e)
            })?;

        let test_value: i32 = row.try_get("test").map_err(AppError::from)?;
        if test_value == 1 {
            Ok(())
        } else {
            Err(AppError::Database("Unexpected health check result".to_string()))
        }
    }
}

pub async fn get_database_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool> {
    info!("Connecting to database: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(AppError::from)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(30))
        .idle_timeout(Duration::from_secs(300))
        .connect_with(options)
        .await
        .map_err(|e| {
            error!("Failed to create database pool: {}", e);
            AppError::from(e)
        })?;

    sqlx::query("PRAGMA journal_mode = WAL")
        .execute(&pool)
        .await
        .map_err(AppError::from)?;

    info!("Database connection pool created successfully");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::run_migrations;
    use tempfile::NamedTempFile;

    async fn setup_backend() -> (SqliteBackend, NamedTempFile) {
        let temp_file = NamedTempFile::new().unwrap();
        let database_url = format!("sqlite:{}", temp_file.path().display());

        let pool = get_database_pool(&database_url, 2).await.unwrap();
        run_migrations(pool.clone()).await.unwrap();

        (SqliteBackend::new(pool), temp_file)
    }

    #[tokio::test]
    async fn test_insert_appointment() {
        let (backend, _file) = setup_backend().await;

        let response = backend
            .insert(
                Table::Appointments,
                vec![json!({
                    "date": "2030-05-01",
                    "time": "09:30",
                    "name": "Ada Lovelace",
                    "email": "ada@example.com"
                })],
            )
            .await
            .unwrap();

        assert!(response.is_ok(), "{:?}", response.error);
        let rows = response.data.unwrap();
        assert_eq!(rows[0]["name"], "Ada Lovelace");
        assert!(rows[0]["id"].as_i64().unwrap() > 0);
        assert_eq!(backend.count(Table::Appointments).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unknown_column_is_a_backend_error() {
        let (backend, _file) = setup_backend().await;

        let response = backend
            .insert(
                Table::Contacts,
                vec![json!({
                    "first_name": "Ada",
                    "last_name": "Lovelace",
                    "email": "ada@example.com",
                    "subject": "Demo",
                    "message": "Hi",
                    "phone": "555-0100"
                })],
            )
            .await
            .unwrap();

        let error = response.error.unwrap();
        assert_eq!(error.code.as_deref(), Some("PGRST204"));
        assert!(error.message.contains("phone"));
        assert_eq!(backend.count(Table::Contacts).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_row_rolls_back_batch() {
        let (backend, _file) = setup_backend().await;

        let valid = json!({
            "first_name": "Ada",
            "last_name": "Lovelace",
            "email": "ada@example.com",
            "subject": "Demo",
            "message": "Hi"
        });
        let invalid = json!({"first_name": "Grace"});

        let response = backend.insert(Table::Contacts, vec![valid, invalid]).await.unwrap();

        assert!(!response.is_ok());
        assert_eq!(backend.count(Table::Contacts).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_health_check() {
        let (backend, _file) = setup_backend().await;
        backend.health_check().await.unwrap();
    }

    #[tokio::test]
    async fn test_closed_pool_is_a_transport_error() {
        let (backend, _file) = setup_backend().await;
        backend.pool().close().await;

        let result = backend
            .insert(Table::Contacts, vec![json!({"first_name": "Ada"})])
            .await;

        assert!(matches!(result, Err(AppError::Database(_))));
    }
}
