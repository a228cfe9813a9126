//! HTTP routes for the lodgings service
//!
//! - `/lodgings` is served from the lodging store
//! - `/lodgings/{id}` is served from the legacy positional store

pub mod legacy;
pub mod lodgings;
pub mod response;

pub use legacy::{handle_delete_lodging, handle_get_lodging, handle_replace_lodging};
pub use lodgings::{handle_create_lodging, handle_list_lodgings, parse_page};
pub use response::{not_found_response, INVALID_LODGING};
