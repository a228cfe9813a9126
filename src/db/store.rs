//! Lodging store trait
//!
//! Implementations provide counting, ordered range fetches and insertion;
//! pagination is built once on top of those.

use async_trait::async_trait;
use tracing::debug;

use crate::db::schemas::{Lodging, LodgingsPage, PageWindow, PAGE_SIZE};
use crate::types::Result;
use crate::validation::Fields;

/// Persistence for lodgings
#[async_trait]
pub trait LodgingStore: Send + Sync {
    /// Total number of stored lodgings
    async fn count(&self) -> Result<u64>;

    /// Up to `limit` lodgings in ascending id order, skipping `offset`
    async fn fetch(&self, offset: u64, limit: u64) -> Result<Vec<Lodging>>;

    /// Store a lodging as given and return its generated id
    async fn insert(&self, lodging: Fields) -> Result<String>;

    /// Fetch one clamped page of lodgings.
    ///
    /// Count and fetch are separate reads, so inserts landing in between can
    /// shift records across page boundaries.
    async fn list_page(&self, requested: i64) -> Result<LodgingsPage> {
        let count = self.count().await?;
        let window = PageWindow::clamp(requested, count, PAGE_SIZE);

        debug!(
            requested,
            page = window.page,
            total_pages = window.total_pages,
            count,
            "Listing lodgings"
        );

        let lodgings = if window.is_empty() {
            Vec::new()
        } else {
            self.fetch(window.offset, PAGE_SIZE).await?
        };

        Ok(LodgingsPage {
            lodgings,
            page: window.page,
            total_pages: window.total_pages,
            page_size: PAGE_SIZE,
            count,
        })
    }
}
