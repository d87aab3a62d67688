//! Record store trait.

use async_trait::async_trait;

use crate::Result;
use crate::types::{DeletedItem, Item, ItemId, ItemStatus, NewItem};

/// The ordered collection of item records.
///
/// Implementations own the collection exclusively. Every mutating call
/// must finish persisting before it returns, and concurrent mutations must
/// not interleave.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// All items, newest first.
    async fn list(&self) -> Result<Vec<Item>>;

    /// A single item by id.
    async fn get(&self, id: &ItemId) -> Result<Item>;

    /// Validate a submission, assign it a fresh id and prepend it.
    async fn create(&self, item: NewItem) -> Result<Item>;

    /// Set the status of an item and stamp `updated_at`.
    async fn update_status(&self, id: &ItemId, status: ItemStatus) -> Result<Item>;

    /// Remove an item and, best effort, its image.
    async fn delete(&self, id: &ItemId) -> Result<DeletedItem>;
}
