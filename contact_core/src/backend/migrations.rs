use crate::error::{AppError, Result};
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};
use tracing::{error, info};

pub struct MigrationManager {
    pool: SqlitePool,
}

impl MigrationManager {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        info!("Starting database migrations");

        self.create_migrations_table().await?;
        self.verify_applied().await?;

        let current_version = self.get_current_version().await?;
        info!("Current migration version: {}", current_version);

        let mut applied_count = 0;
        for migration in migrations() {
            if migration.version > current_version {
                info!("Applying migration {}: {}", migration.version, migration.name);
                self.apply_migration(&migration).await?;
                applied_count += 1;
            }
        }

        if applied_count > 0 {
            info!("Applied {} migrations successfully", applied_count);
        } else {
            info!("No new migrations to apply");
        }

        Ok(())
    }

    async fn create_migrations_table(&self) -> Result<()> {
        sqlx::query(r#"
            CREATE TABLE IF NOT EXISTS _migrations (
                version INTEGER PRIMARY KEY,
                name TEXT NOT NULL,
                applied_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                checksum TEXT NOT NULL
            )
        "#)
        .execute(&self.pool)
        .await
        .map_err(AppError::from)?;

        Ok(())
    }

    /// Fails when an already-applied migration no longer matches the one
    /// compiled into this binary.
    async fn verify_applied(&self) -> Result<()> {
        let known = migrations();

        for record in self.get_migration_history().await? {
            let Some(migration) = known.iter().find(|m| m.version == record.version) else {
                return Err(AppError::Database(format!(
                    "Database has migration {} ({}) unknown to this build",
                    record.version, record.name
                )));
            };

            if migration.checksum != record.checksum {
                error!(
                    version = record.version,
                    expected = migration.checksum,
                    found = %record.checksum,
                    "migration checksum mismatch"
                );
                return Err(AppError::Database(format!(
                    "Migration {} ({}) checksum mismatch",
                    record.version, record.name
                )));
            }
        }

        Ok(())
    }

    async fn get_current_version(&self) -> Result<i64> {
        let row = sqlx::query("SELECT COALESCE(MAX(version), 0) as version FROM _migrations")
            .fetch_one(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(row.try_get("version").unwrap_or(0))
    }

    async fn apply_migration(&self, migration: &Migration) -> Result<()> {
        let mut tx = self.pool.begin().await.map_err(AppError::from)?;

        for statement in migration.sql_statements {
            sqlx::query(statement)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!("Failed to execute migration statement: {}", e);
                    AppError::from(e)
                })?;
        }

        sqlx::query("INSERT INTO _migrations (version, name, checksum) VALUES (?, ?, ?)")
            .bind(migration.version)
            .bind(migration.name)
            .bind(migration.checksum)
            .execute(&mut *tx)
            .await
            .map_err(AppError::from)?;

        tx.commit().await.map_err(AppError::from)?;
        Ok(())
    }

    pub async fn get_migration_history(&self) -> Result<Vec<MigrationRecord>> {
        let rows = sqlx::query("SELECT version, name, applied_at, checksum FROM _migrations ORDER BY version")
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::from)?;

        Ok(rows
            .into_iter()
            .map(|row| MigrationRecord {
                version: row.try_get("version").unwrap_or(0),
                name: row.try_get("name").unwrap_or_default(),
                applied_at: row.try_get("applied_at").unwrap_or_else(|_| Utc::now()),
                checksum: row.try_get("checksum").unwrap_or_default(),
            })
            .collect())
    }
}

#[derive(Debug, Clone)]
struct Migration {
    version: i64,
    name: &'static str,
    checksum: &'static str,
    sql_statements: &'static [&'static str],
}

fn migrations() -> Vec<Migration> {
    vec![
        Migration {
            version: 1,
            name: "create_appointments_table",
            checksum: "appointments_v1",
            sql_statements: &[
                r#"
                CREATE TABLE appointments (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    date TEXT NOT NULL,
                    time TEXT NOT NULL,
                    name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
                )
                "#,
                "CREATE INDEX idx_appointments_date ON appointments(date, time)",
            ],
        },
        Migration {
            version: 2,
            name: "create_contacts_table",
            checksum: "contacts_v1",
            sql_statements: &[
                r#"
                CREATE TABLE contacts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    first_name TEXT NOT NULL,
                    last_name TEXT NOT NULL,
                    email TEXT NOT NULL,
                    subject TEXT NOT NULL,
                    message TEXT NOT NULL,
                    created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
                )
                "#,
                "CREATE INDEX idx_contacts_email ON contacts(email)",
            ],
        },
    ]
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MigrationRecord {
    pub version: i64,
    pub name: String,
    pub applied_at: DateTime<Utc>,
    pub checksum: String,
}

pub async fn run_migrations(pool: SqlitePool) -> Result<()> {
    MigrationManager::new(pool).run_migrations().await
}
