//! TreeStore Trait - Remote Block Tree Abstraction
//!
//! The reconciler only needs three operations from the remote hierarchical
//! document: list the direct children of a block, append children to a block,
//! and delete a block. Implementations:
//!
//! - [`NotionStore`](super::NotionStore) - the Notion REST API
//! - [`InMemoryTreeStore`](super::InMemoryTreeStore) - tests and dry runs
//!
//! All methods are async; implementations must be `Send + Sync` so a store
//! can be shared behind an `Arc<dyn TreeStore>`.

use crate::models::{BlockSpec, RemoteBlock};
use crate::store::StoreError;
use async_trait::async_trait;

#[async_trait]
pub trait TreeStore: Send + Sync {
    /// Direct children of `block_id`, in the store's listing order
    async fn list_children(&self, block_id: &str) -> Result<Vec<RemoteBlock>, StoreError>;

    /// Append `specs` as the last children of `parent_id`, in order
    ///
    /// Returns the ids of the created blocks in the same order as `specs`.
    async fn create_children(
        &self,
        parent_id: &str,
        specs: &[BlockSpec],
    ) -> Result<Vec<String>, StoreError>;

    /// Delete one block (and, implicitly, its subtree)
    async fn delete_block(&self, block_id: &str) -> Result<(), StoreError>;
}

/// Resolves a page (a reconciliation root) from a database unique id
#[async_trait]
pub trait PageLocator: Send + Sync {
    /// `Ok(None)` when no page carries `unique_id`
    async fn find_page_by_unique_id(&self, unique_id: u64) -> Result<Option<String>, StoreError>;
}
