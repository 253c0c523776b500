//! Tree Store Error Types
//!
//! Failures reported by a [`TreeStore`](super::TreeStore) implementation.

use thiserror::Error;

/// Tree store operation errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// Remote API answered with a non-success status
    #[error("Remote API returned {status}: {body}")]
    Http { status: u16, body: String },

    /// Request never got a response (connect, timeout, TLS, ...)
    #[error("Request failed: {0}")]
    Transport(String),

    /// Response body did not have the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),

    /// Block id unknown to the store
    #[error("Block not found: {id}")]
    NotFound { id: String },

    /// Store cannot serve the request right now
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Create a not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create an unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// HTTP status equivalent, when the failure maps to one
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::NotFound { .. } => Some(404),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}
