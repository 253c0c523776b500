//! PageDigest Core
//!
//! Turns generated markdown (summaries, meeting minutes) into typed blocks
//! and keeps one labeled section of a remote page in sync with it.
//!
//! # Architecture
//!
//! - **Pure rendering**: markdown → logical units → renderable blocks, with no
//!   I/O and no failure modes
//! - **Idempotent reconciliation**: find-or-create container and section, then
//!   replace the section body; re-running with the same input converges
//! - **Pluggable store**: the remote tree sits behind the `TreeStore` trait
//!   (Notion REST API or an in-memory tree)
//!
//! # Modules
//!
//! - [`markdown`] - inline tokenizer, block classifier, paragraph chunker, renderer
//! - [`models`] - block and path types shared by every layer
//! - [`store`] - `TreeStore` trait and its backends
//! - [`services`] - section reconciler and summary publisher
//! - [`config`] - environment-driven settings
//! - [`error`] - sync error kinds

pub mod config;
pub mod error;
pub mod markdown;
pub mod models;
pub mod services;
pub mod store;

// Re-export commonly used types
pub use config::DigestConfig;
pub use error::SyncError;
pub use markdown::markdown_to_blocks;
pub use models::*;
pub use services::*;
pub use store::{InMemoryTreeStore, NotionStore, PageLocator, StoreError, TreeStore};
