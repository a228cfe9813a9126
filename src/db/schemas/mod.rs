//! Database schemas for the lodgings service
//!
//! Defines the document layout of the `lodgings` collection and the page
//! shape returned by listings.

mod lodging;

pub use lodging::{
    id_to_string, lodging_schema, Lodging, LodgingsPage, PageWindow, INVALID_LODGING,
    LODGING_COLLECTION, PAGE_SIZE,
};
