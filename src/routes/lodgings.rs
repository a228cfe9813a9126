//! Lodging collection routes
//!
//! - `GET /lodgings?page=N` - One page of stored lodgings
//! - `POST /lodgings` - Validate and store a lodging

use hyper::{Response, StatusCode};
use serde_json::{json, Value};
use tracing::info;

use crate::routes::response::{error_response, json_response, FullBody, INVALID_LODGING};
use crate::server::AppState;
use crate::types::{LodgingError, Result};
use crate::validation::validate_against_schema;

const LIST_FAILED: &str = "Error fetching lodgings.  Try again later.";
const INSERT_FAILED: &str = "Failed to insert lodging.  Try again later.";

/// Read the `page` query parameter.
///
/// The query string is form-decoded first (`+` is a space, `%XX` escapes are
/// resolved). The value is then read as a leading integer the way a lenient
/// integer parse would: leading whitespace and a sign are allowed and
/// trailing junk is ignored. Missing, non-numeric and zero values all mean
/// page 1.
pub fn parse_page(query: Option<&str>) -> i64 {
    query
        .and_then(|q| {
            q.split('&').find_map(|pair| {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                (decode_component(key) == "page").then(|| decode_component(value))
            })
        })
        .and_then(|value| parse_int_prefix(&value))
        .filter(|page| *page != 0)
        .unwrap_or(1)
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_default()
}

fn parse_int_prefix(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }

    let magnitude = digits[..end].parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// GET /lodgings
pub async fn handle_list_lodgings(state: &AppState, query: Option<&str>) -> Response<FullBody> {
    let page = parse_page(query);

    match state.store.list_page(page).await {
        Ok(lodgings_page) => json_response(StatusCode::OK, &lodgings_page),
        Err(e) => error_response(&e, LIST_FAILED),
    }
}

/// POST /lodgings
pub async fn handle_create_lodging(state: &AppState, body: &Value) -> Response<FullBody> {
    match create_lodging(state, body).await {
        Ok(id) => {
            info!(id = %id, "Lodging created");
            json_response(StatusCode::CREATED, &json!({ "id": id }))
        }
        Err(e) => error_response(&e, INSERT_FAILED),
    }
}

async fn create_lodging(state: &AppState, body: &Value) -> Result<String> {
    let fields = match body.as_object() {
        Some(fields) if validate_against_schema(body, &state.schema) => fields.clone(),
        _ => return Err(LodgingError::Validation(INVALID_LODGING.to_string())),
    };

    state.store.insert(state.schema.prepare(fields)).await
}
