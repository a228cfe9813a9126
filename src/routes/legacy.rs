//! Single-lodging routes over the legacy positional store
//!
//! - `GET /lodgings/{id}` - Fetch the lodging in slot `id`
//! - `PUT /lodgings/{id}` - Replace the lodging in slot `id`
//! - `DELETE /lodgings/{id}` - Empty slot `id`
//!
//! These routes never touch the database. An unknown or empty slot returns
//! `None` so the caller falls through to the generic 404 handler.

use hyper::{Response, StatusCode};
use serde_json::Value;

use crate::routes::response::{error_response, json_response, no_content, FullBody};
use crate::server::AppState;
use crate::types::Result;

const REPLACE_FAILED: &str = "Failed to replace lodging.  Try again later.";
const DELETE_FAILED: &str = "Failed to delete lodging.  Try again later.";

/// Not-found falls through to the 404 handler; other errors map by status
fn respond(result: Result<()>, server_message: &str) -> Option<Response<FullBody>> {
    match result {
        Ok(()) => Some(no_content()),
        Err(e) if e.status_code() == StatusCode::NOT_FOUND => None,
        Err(e) => Some(error_response(&e, server_message)),
    }
}

/// GET /lodgings/{id}
pub fn handle_get_lodging(state: &AppState, id: &str) -> Option<Response<FullBody>> {
    state
        .legacy
        .get(id)
        .map(|lodging| json_response(StatusCode::OK, &lodging))
}

/// PUT /lodgings/{id}
pub fn handle_replace_lodging(
    state: &AppState,
    id: &str,
    body: &Value,
) -> Option<Response<FullBody>> {
    respond(state.legacy.replace(id, body, &state.schema), REPLACE_FAILED)
}

/// DELETE /lodgings/{id}
pub fn handle_delete_lodging(state: &AppState, id: &str) -> Option<Response<FullBody>> {
    respond(state.legacy.soft_delete(id), DELETE_FAILED)
}
