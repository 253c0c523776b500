//! Tree Store Layer
//!
//! Abstraction over the remote hierarchical document the reconciler writes
//! into, with two backends:
//!
//! - `NotionStore` - Notion REST API over HTTPS
//! - `InMemoryTreeStore` - ordered in-process tree with failure injection
//!
//! The store is a collaborator, not part of the reconciliation logic: it
//! performs no retries and holds no state across requests beyond what the
//! backend itself keeps.

mod error;
mod memory_store;
mod notion_store;
mod tree_store;

pub use error::StoreError;
pub use memory_store::InMemoryTreeStore;
pub use notion_store::NotionStore;
pub use tree_store::{PageLocator, TreeStore};
