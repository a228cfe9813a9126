//! Database layer for the lodgings service
//!
//! `LodgingStore` is the seam between the HTTP routes and persistence:
//! MongoDB in production, a process-local store in dev mode and tests.

pub mod memory;
pub mod mongo;
pub mod schemas;
pub mod store;

pub use memory::MemoryLodgingStore;
pub use mongo::{MongoClient, MongoLodgingStore};
pub use schemas::{Lodging, LodgingsPage, PageWindow, LODGING_COLLECTION, PAGE_SIZE};
pub use store::LodgingStore;
