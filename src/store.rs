//! Persistence seam. Compiled records are handed to an external resource store one row at a
//! time; the store owns transport, schema and retries.

use crate::error::StoreError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Mutex;
use uuid::Uuid;

/// Field map for one stored row, keyed by store column name.
pub type Fields = Map<String, Value>;

/// `store(category, fields) -> id`. Implementations must be idempotent per call.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn store(&self, category: &str, fields: Fields) -> Result<String, StoreError>;
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StoredRecord {
    pub id: String,
    pub category: String,
    pub fields: Fields,
}

/// In-process store keeping rows in insertion order. Ids are UUID v4.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<StoredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Result<Vec<StoredRecord>, StoreError> {
        let records = self
            .records
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(records.clone())
    }

    pub fn by_category(&self, category: &str) -> Result<Vec<StoredRecord>, StoreError> {
        Ok(self
            .records()?
            .into_iter()
            .filter(|r| r.category == category)
            .collect())
    }
}

#[async_trait]
impl ResourceStore for MemoryStore {
    async fn store(&self, category: &str, fields: Fields) -> Result<String, StoreError> {
        let id = Uuid::new_v4().to_string();
        let mut records = self
            .records
            .lock()
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        records.push(StoredRecord {
            id: id.clone(),
            category: category.to_string(),
            fields,
        });
        Ok(id)
    }
}
