//! Lodgings - HTTP API for lodging listings
//!
//! Collection routes (`/lodgings`) page through and insert into a MongoDB
//! collection. Single-lodging routes (`/lodgings/{id}`) still read and write a
//! legacy in-memory collection addressed by position; its ids are unrelated
//! to the database ids.
//!
//! ## Modules
//!
//! - **validation**: Presence-only schema checks
//! - **db**: `LodgingStore` trait with MongoDB and in-memory implementations
//! - **legacy**: Position-indexed store with soft delete
//! - **routes** / **server**: hyper server and request routing

pub mod config;
pub mod db;
pub mod legacy;
pub mod logging;
pub mod routes;
pub mod server;
pub mod types;
pub mod validation;

pub use config::Args;
pub use server::{run, serve, AppState};
pub use types::{LodgingError, Result};
