//! Legacy positional lodging store
//!
//! Serves `/lodgings/{id}` from a fixed, pre-seeded collection that never
//! touches the database. Slots are addressed by position, which is a separate
//! id space from the database ids handed out by `POST /lodgings`.
//!
//! Deleting a lodging empties its slot but keeps the index allocated, so
//! indexes are never reused for a different record and a later `PUT` can fill
//! the slot again.

use dashmap::DashMap;
use serde_json::Value;
use std::path::Path;
use tracing::{debug, info};

use crate::db::schemas::INVALID_LODGING;
use crate::types::{LodgingError, Result};
use crate::validation::{validate_against_schema, Fields, Schema};

/// Seed compiled into the binary
const BUNDLED_SEED: &str = include_str!("../data/lodgings.json");

/// Position-indexed lodgings with soft delete
#[derive(Debug)]
pub struct LegacyStore {
    slots: DashMap<usize, Option<Fields>>,
    allocated: usize,
}

impl LegacyStore {
    /// Build a store whose slots are exactly `seed`
    pub fn from_seed(seed: Vec<Option<Fields>>) -> Self {
        let allocated = seed.len();
        let slots = seed.into_iter().enumerate().collect();
        Self { slots, allocated }
    }

    /// Parse a JSON array seed; `null` entries are allocated empty slots
    pub fn from_json(json: &str) -> Result<Self> {
        let seed: Vec<Option<Fields>> = serde_json::from_str(json)
            .map_err(|e| LodgingError::Config(format!("Invalid legacy seed: {}", e)))?;
        Ok(Self::from_seed(seed))
    }

    /// Store seeded from the bundled data set
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_SEED)
    }

    /// Load from a seed file, or the bundled seed when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let store = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    LodgingError::Config(format!(
                        "Failed to read legacy seed {}: {}",
                        path.display(),
                        e
                    ))
                })?;
                Self::from_json(&json)?
            }
            None => Self::bundled()?,
        };

        info!(
            "Legacy store seeded with {} slot(s), {} occupied",
            store.allocated(),
            store.occupied()
        );

        Ok(store)
    }

    /// Resolve a path id to a slot index.
    ///
    /// Only the canonical decimal form addresses a slot: "7" does, "07",
    /// "+7" and "7.0" do not.
    pub fn parse_index(id: &str) -> Option<usize> {
        let index = id.parse::<usize>().ok()?;
        (index.to_string() == id).then_some(index)
    }

    /// Number of allocated slots, occupied or not
    pub fn allocated(&self) -> usize {
        self.allocated
    }

    /// Number of slots currently holding a lodging
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|slot| slot.value().is_some()).count()
    }

    /// Lodging at `id`, if the slot exists and is occupied
    pub fn get(&self, id: &str) -> Option<Fields> {
        let index = Self::parse_index(id)?;
        self.slots.get(&index).and_then(|slot| slot.value().clone())
    }

    /// Overwrite the slot at `id` with `record`.
    ///
    /// The slot must be allocated; it may be empty. The record is checked
    /// against `schema` only after the slot is found, and a rejected record
    /// leaves the slot untouched.
    pub fn replace(&self, id: &str, record: &Value, schema: &Schema) -> Result<()> {
        let mut slot = Self::parse_index(id)
            .and_then(|index| self.slots.get_mut(&index))
            .ok_or_else(|| LodgingError::NotFound(id.to_string()))?;

        let fields = match record {
            Value::Object(fields) if validate_against_schema(record, schema) => fields.clone(),
            _ => return Err(LodgingError::Validation(INVALID_LODGING.to_string())),
        };

        *slot = Some(fields);
        debug!(id, "Legacy lodging replaced");
        Ok(())
    }

    /// Empty the slot at `id` without releasing its index
    pub fn soft_delete(&self, id: &str) -> Result<()> {
        let mut slot = Self::parse_index(id)
            .and_then(|index| self.slots.get_mut(&index))
            .filter(|slot| slot.is_some())
            .ok_or_else(|| LodgingError::NotFound(id.to_string()))?;

        *slot = None;
        debug!(id, "Legacy lodging soft-deleted");
        Ok(())
    }
}
