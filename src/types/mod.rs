//! Shared types for the lodgings service

pub mod error;

pub use error::{LodgingError, Result};
