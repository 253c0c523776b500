//! Runtime configuration
//!
//! Settings come from the environment (see [`DigestConfig::from_env`]).
//! Section labels here are only defaults for callers; the reconciler itself
//! takes the label per invocation and knows nothing about their meaning.

use crate::error::SyncError;
use crate::markdown::DEFAULT_MAX_CHUNK_CHARS;
use serde::{Deserialize, Serialize};
use std::env;

/// Hard per-block text limit of the remote API
pub const REMOTE_BLOCK_CHAR_LIMIT: usize = 2000;

/// Configuration for rendering and the remote block store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestConfig {
    /// Integration token for the remote API
    #[serde(skip_serializing, default)]
    pub notion_api_key: String,

    /// Value of the `Notion-Version` header
    pub notion_api_version: String,

    /// API base URL (overridable for proxies and tests)
    pub notion_base_url: String,

    /// Database searched by unique id
    pub database_id: String,

    /// Name of the unique-id property in that database
    pub unique_id_property: String,

    /// Default label of the summary section
    pub summary_label: String,

    /// Default label of the meeting-minutes section
    pub minutes_label: String,

    /// Maximum characters per paragraph block
    pub max_chunk_len: usize,

    /// Per-request timeout for remote calls
    pub request_timeout_ms: u64,
}

impl Default for DigestConfig {
    fn default() -> Self {
        Self {
            notion_api_key: String::new(),
            notion_api_version: "2022-06-28".to_string(),
            notion_base_url: "https://api.notion.com/v1".to_string(),
            database_id: String::new(),
            unique_id_property: "ID".to_string(),
            summary_label: "Summary".to_string(),
            minutes_label: "議事録".to_string(),
            max_chunk_len: DEFAULT_MAX_CHUNK_CHARS,
            request_timeout_ms: 30_000,
        }
    }
}

impl DigestConfig {
    /// Load from environment variables, falling back to defaults
    pub fn from_env() -> Result<Self, SyncError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using `lookup` in place of the process environment
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SyncError> {
        let defaults = Self::default();
        let text = |key: &str, default: String| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(default)
        };

        let max_chunk_len = match lookup("MAX_BLOCK_CHARS").filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => raw.trim().parse::<usize>().map_err(|_| {
                SyncError::configuration(format!("MAX_BLOCK_CHARS must be a number, got '{}'", raw))
            })?,
            None => defaults.max_chunk_len,
        };
        let request_timeout_ms = match lookup("NOTION_TIMEOUT_MS").filter(|raw| !raw.trim().is_empty()) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                SyncError::configuration(format!("NOTION_TIMEOUT_MS must be a number, got '{}'", raw))
            })?,
            None => defaults.request_timeout_ms,
        };

        let config = Self {
            notion_api_key: text("NOTION_API_KEY", defaults.notion_api_key),
            notion_api_version: text("NOTION_API_VERSION", defaults.notion_api_version),
            notion_base_url: text("NOTION_BASE_URL", defaults.notion_base_url),
            database_id: text("NOTION_DATABASE_ID", defaults.database_id),
            unique_id_property: text("UNIQUE_ID_PROPERTY_NAME", defaults.unique_id_property),
            summary_label: text("SUMMARY_TOGGLE_H3_TITLE", defaults.summary_label),
            minutes_label: text("MINUTES_TOGGLE_H3_TITLE", defaults.minutes_label),
            max_chunk_len,
            request_timeout_ms,
        };

        config.validate().map_err(SyncError::configuration)?;
        Ok(config)
    }

    /// Validate settings that every operation depends on
    pub fn validate(&self) -> Result<(), String> {
        if self.max_chunk_len == 0 {
            return Err("max_chunk_len must be greater than 0".to_string());
        }

        if self.max_chunk_len > REMOTE_BLOCK_CHAR_LIMIT {
            return Err(format!(
                "max_chunk_len cannot exceed {} (remote per-block limit)",
                REMOTE_BLOCK_CHAR_LIMIT
            ));
        }

        if self.request_timeout_ms == 0 {
            return Err("request_timeout_ms must be greater than 0".to_string());
        }

        if self.summary_label.is_empty() || self.minutes_label.is_empty() {
            return Err("section labels cannot be empty".to_string());
        }

        Ok(())
    }

    /// Validate settings needed to talk to the remote API
    pub fn require_remote(&self) -> Result<(), SyncError> {
        if self.notion_api_key.is_empty() {
            return Err(SyncError::configuration("NOTION_API_KEY is not set"));
        }
        Ok(())
    }

    /// Validate settings needed for unique-id page lookup
    pub fn require_database(&self) -> Result<(), SyncError> {
        self.require_remote()?;
        if self.database_id.is_empty() {
            return Err(SyncError::configuration("NOTION_DATABASE_ID is not set"));
        }
        Ok(())
    }
}
