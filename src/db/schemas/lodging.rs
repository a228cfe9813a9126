//! Lodging document schema
//!
//! Lodgings are stored as loose documents: the schema only gates presence of
//! the required fields, so the stored shape is whatever the client sent.

use bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use tracing::debug;

use crate::types::{LodgingError, Result};
use crate::validation::{Fields, Schema};

/// Collection name for lodgings
pub const LODGING_COLLECTION: &str = "lodgings";

/// Number of lodgings per listing page
pub const PAGE_SIZE: u64 = 10;

/// Message for a body that fails lodging validation
pub const INVALID_LODGING: &str = "Request body does not contain a valid Lodging.";

/// Declared fields of a lodging
pub fn lodging_schema(strip_unknown: bool) -> Schema {
    // street, city, state and zip stay folded into `address` until the
    // clients send structured addresses.
    Schema::new()
        .field("name", true)
        .field("description", false)
        .field("address", true)
        .field("price", true)
        .field("ownerid", true)
        .strip_unknown(strip_unknown)
}

/// A stored lodging as returned to clients
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Lodging {
    /// Database-assigned identifier, rendered as a string
    #[serde(rename = "_id")]
    pub id: String,

    /// Every other stored field, as submitted
    #[serde(flatten)]
    pub fields: Fields,
}

impl Lodging {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    /// Convert a raw collection document into a lodging
    pub fn from_document(mut doc: Document) -> Self {
        let id = doc.remove("_id").map(|id| id_to_string(&id)).unwrap_or_default();

        let fields = match Bson::Document(doc).into_relaxed_extjson() {
            serde_json::Value::Object(fields) => fields,
            _ => Fields::new(),
        };

        Self { id, fields }
    }

    /// Encode submitted fields as a document for insertion.
    ///
    /// A body that BSON cannot represent is a client error, not a store
    /// failure.
    pub fn to_document(fields: &Fields) -> Result<Document> {
        let fields: Fields = fields
            .iter()
            .map(|(name, value)| (name.clone(), widen_unsigned(value.clone())))
            .collect();

        bson::to_document(&fields).map_err(|e| {
            debug!("Lodging cannot be encoded as BSON: {}", e);
            LodgingError::Validation(INVALID_LODGING.to_string())
        })
    }
}

/// BSON has no unsigned 64-bit integer: integers past `i64::MAX` are stored
/// as doubles.
fn widen_unsigned(value: Value) -> Value {
    match value {
        Value::Number(n) if n.is_u64() && !n.is_i64() => n
            .as_f64()
            .and_then(Number::from_f64)
            .map_or(Value::Number(n), Value::Number),
        Value::Array(items) => Value::Array(items.into_iter().map(widen_unsigned).collect()),
        Value::Object(fields) => Value::Object(
            fields
                .into_iter()
                .map(|(name, value)| (name, widen_unsigned(value)))
                .collect(),
        ),
        other => other,
    }
}

/// Render a document identifier for clients
///
/// ObjectIds become their hex string; other id types use their relaxed
/// extended JSON form.
pub fn id_to_string(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.clone().into_relaxed_extjson().to_string(),
    }
}

/// One page of a lodgings listing
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LodgingsPage {
    pub lodgings: Vec<Lodging>,
    pub page: u64,
    pub total_pages: u64,
    pub page_size: u64,
    pub count: u64,
}

/// Clamped position of a requested page within the current count
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u64,
    pub total_pages: u64,
    pub offset: u64,
}

impl PageWindow {
    /// Clamp `requested` into `[1, total_pages]`.
    ///
    /// With no records there are no pages, so the result is page 0 at
    /// offset 0 and nothing should be fetched.
    pub fn clamp(requested: i64, count: u64, page_size: u64) -> Self {
        let total_pages = count.div_ceil(page_size);
        let page = u64::try_from(requested.max(1))
            .unwrap_or(1)
            .min(total_pages);
        let offset = page.saturating_sub(1) * page_size;

        Self {
            page,
            total_pages,
            offset,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.page == 0
    }
}
