//! Schema validation for incoming records
//!
//! A schema is a flat list of declared fields, each either required or
//! optional. Validation is a presence gate only: values are not type checked,
//! and fields the schema does not declare pass through untouched unless the
//! schema is built with `strip_unknown(true)`.

use serde_json::{Map, Value};

/// JSON object fields of a candidate record
pub type Fields = Map<String, Value>;

/// Declared fields of a record type
#[derive(Debug, Clone, Default)]
pub struct Schema {
    /// Declared field names with their required flag
    fields: Vec<(&'static str, bool)>,
    strip_unknown: bool,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a field
    pub fn field(mut self, name: &'static str, required: bool) -> Self {
        self.fields.push((name, required));
        self
    }

    /// Drop undeclared fields before a record is stored
    pub fn strip_unknown(mut self, strip: bool) -> Self {
        self.strip_unknown = strip;
        self
    }

    pub fn strips_unknown(&self) -> bool {
        self.strip_unknown
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|(_, required)| *required)
            .map(|(name, _)| *name)
    }

    /// Shape a validated record for storage according to `strip_unknown`
    pub fn prepare(&self, fields: Fields) -> Fields {
        if self.strip_unknown {
            extract_valid_fields(&fields, self)
        } else {
            fields
        }
    }
}

/// Check a candidate against a schema.
///
/// Returns true iff the candidate is a JSON object and every required field
/// is present with a non-empty value.
pub fn validate_against_schema(candidate: &Value, schema: &Schema) -> bool {
    match candidate.as_object() {
        Some(fields) => schema
            .required_fields()
            .all(|name| fields.get(name).is_some_and(is_present)),
        None => false,
    }
}

/// Copy only the fields the schema declares
pub fn extract_valid_fields(candidate: &Fields, schema: &Schema) -> Fields {
    schema
        .fields
        .iter()
        .filter_map(|(name, _)| {
            candidate
                .get(*name)
                .map(|value| ((*name).to_string(), value.clone()))
        })
        .collect()
}

/// `null` and `""` count as missing; everything else is a value.
fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}
