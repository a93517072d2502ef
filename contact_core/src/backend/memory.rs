//! In-process backend used when no external store is configured

use super::{BackendError, InsertBackend, InsertResponse, Table};
use crate::error::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Clone, Default)]
pub struct MemoryBackend {
    tables: Arc<RwLock<HashMap<Table, Vec<Value>>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.tables.read().get(&table).cloned().unwrap_or_default()
    }

    pub fn count(&self, table: Table) -> usize {
        self.tables.read().get(&table).map(Vec::len).unwrap_or(0)
    }
}

#[async_trait]
impl InsertBackend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<InsertResponse> {
        let mut stamped = Vec::with_capacity(rows.len());

        for row in rows {
            let Value::Object(columns) = row else {
                return Ok(InsertResponse::failed(
                    BackendError::new(format!("Row for table '{}' must be a JSON object", table))
                        .with_code("PGRST102"),
                ));
            };

            let mut record = Map::new();
            record.insert("id".to_string(), Value::String(uuid::Uuid::new_v4().to_string()));
            record.extend(columns);
            record.insert("created_at".to_string(), Value::String(chrono::Utc::now().to_rfc3339()));
            stamped.push(Value::Object(record));
        }

        let mut tables = self.tables.write();
        tables.entry(table).or_default().extend(stamped.iter().cloned());
        debug!(table = %table, inserted = stamped.len(), "stored rows in memory");

        Ok(InsertResponse::inserted(stamped))
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}
