//! Sync Error Types
//!
//! Errors surfaced by section reconciliation and publishing. The markdown
//! pipeline never fails, so every remote variant wraps a [`StoreError`] from
//! the tree store collaborator. Per-child delete failures are not errors;
//! they are reported as [`DeleteOutcome::Failed`](crate::services::DeleteOutcome).

use crate::store::StoreError;
use thiserror::Error;

/// Section sync errors
#[derive(Error, Debug)]
pub enum SyncError {
    /// Caller-supplied input was rejected before any remote call
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Listing children failed
    #[error("Failed to list children of {block_id}: {source}")]
    RemoteLookupFailed {
        block_id: String,
        #[source]
        source: StoreError,
    },

    /// Creating the container or the section failed
    #[error("Failed to create {what} under {parent_id}: {source}")]
    RemoteCreateFailed {
        parent_id: String,
        what: &'static str,
        #[source]
        source: StoreError,
    },

    /// Appending the rendered blocks failed
    #[error("Failed to append blocks to section {section_id}: {source}")]
    RemoteAppendFailed {
        section_id: String,
        #[source]
        source: StoreError,
    },

    /// Querying the database for a unique id failed
    #[error("Failed to look up page with unique id {unique_id}: {source}")]
    PageLookupFailed {
        unique_id: u64,
        #[source]
        source: StoreError,
    },

    /// No page carries the requested unique id
    #[error("Page not found for unique id: {unique_id}")]
    PageNotFound { unique_id: u64 },

    /// Missing or invalid settings
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SyncError {
    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a lookup failure for `block_id`
    pub fn lookup_failed(block_id: impl Into<String>, source: StoreError) -> Self {
        Self::RemoteLookupFailed {
            block_id: block_id.into(),
            source,
        }
    }

    /// Create a create failure for `what` under `parent_id`
    pub fn create_failed(
        parent_id: impl Into<String>,
        what: &'static str,
        source: StoreError,
    ) -> Self {
        Self::RemoteCreateFailed {
            parent_id: parent_id.into(),
            what,
            source,
        }
    }

    /// Create an append failure for `section_id`
    pub fn append_failed(section_id: impl Into<String>, source: StoreError) -> Self {
        Self::RemoteAppendFailed {
            section_id: section_id.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// HTTP status of the underlying remote failure, if there was one
    pub fn remote_status(&self) -> Option<u16> {
        match self {
            Self::RemoteLookupFailed { source, .. }
            | Self::RemoteCreateFailed { source, .. }
            | Self::RemoteAppendFailed { source, .. }
            | Self::PageLookupFailed { source, .. } => source.status(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SyncError::lookup_failed(
            "root-1",
            StoreError::Http {
                status: 502,
                body: "bad gateway".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "Failed to list children of root-1: Remote API returned 502: bad gateway"
        );
        assert_eq!(err.remote_status(), Some(502));

        let err = SyncError::create_failed("root-1", "container", StoreError::unavailable("down"));
        assert_eq!(
            err.to_string(),
            "Failed to create container under root-1: Store unavailable: down"
        );
        assert_eq!(err.remote_status(), None);
    }

    #[test]
    fn test_source_is_chained() {
        use std::error::Error;

        let err = SyncError::append_failed("section-1", StoreError::not_found("section-1"));
        let source = err.source().map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("Block not found: section-1"));
    }
}
