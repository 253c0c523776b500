//! Sync Services
//!
//! - `SectionReconciler` - idempotent replacement of one labeled section's body
//! - `SummaryPublisher` - markdown rendering plus reconciliation, optionally
//!   resolving the target page from a database unique id first
//!
//! Services talk to the remote document only through
//! [`TreeStore`](crate::store::TreeStore), so every path runs unchanged against
//! the in-memory store.

pub mod publisher;
pub mod reconciler;

pub use publisher::{PublishReport, SectionKind, SummaryPublisher};
pub use reconciler::{DeleteOutcome, ReconcileReport, SectionReconciler};
