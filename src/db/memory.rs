//! Process-local lodging store
//!
//! Used in dev mode and by tests. Mirrors the MongoDB behavior that matters
//! to clients: generated ObjectId hex ids and rejection of a duplicate
//! client-supplied `_id`. Listings come back in insertion order, which matches
//! MongoDB's `_id` order only while every id is a generated ObjectId.

use async_trait::async_trait;
use bson::oid::ObjectId;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::db::schemas::Lodging;
use crate::db::store::LodgingStore;
use crate::types::{LodgingError, Result};
use crate::validation::Fields;

/// In-memory lodging store
#[derive(Debug, Default)]
pub struct MemoryLodgingStore {
    lodgings: RwLock<Vec<Lodging>>,
}

impl MemoryLodgingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LodgingStore for MemoryLodgingStore {
    async fn count(&self) -> Result<u64> {
        Ok(self.lodgings.read().await.len() as u64)
    }

    async fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<Lodging>> {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(self
            .lodgings
            .read()
            .await
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn insert(&self, mut lodging: Fields) -> Result<String> {
        let id = match lodging.remove("_id") {
            Some(Value::String(id)) => id,
            Some(other) => other.to_string(),
            None => ObjectId::new().to_hex(),
        };

        let mut lodgings = self.lodgings.write().await;
        if lodgings.iter().any(|existing| existing.id == id) {
            return Err(LodgingError::Store(format!("duplicate key: _id {}", id)));
        }
        lodgings.push(Lodging::new(id.clone(), lodging));

        Ok(id)
    }
}
