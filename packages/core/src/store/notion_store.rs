//! Notion REST API tree store
//!
//! Implements [`TreeStore`] over `reqwest`:
//!
//! - `GET /blocks/{id}/children` (follows `has_more` / `next_cursor`)
//! - `PATCH /blocks/{id}/children` (batches of at most 100 children)
//! - `DELETE /blocks/{id}`
//!
//! plus the database query used to resolve a page from its unique id.

use crate::config::DigestConfig;
use crate::error::SyncError;
use crate::models::{BlockSpec, RemoteBlock};
use crate::store::{PageLocator, StoreError, TreeStore};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Remote cap on children per append request
const MAX_CHILDREN_PER_REQUEST: usize = 100;

/// Page size used when listing children
const LIST_PAGE_SIZE: &str = "100";

/// One page of a paginated list response
#[derive(Debug, Deserialize)]
struct ListPage {
    results: Vec<Value>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

pub struct NotionStore {
    client: reqwest::Client,
    base_url: String,
    database_id: String,
    unique_id_property: String,
}

impl NotionStore {
    /// Build a client from `config`; the API key must be set
    pub fn new(config: &DigestConfig) -> Result<Self, SyncError> {
        config.require_remote()?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.notion_api_key))
            .map_err(|_| SyncError::configuration("NOTION_API_KEY is not a valid header value"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(
            "Notion-Version",
            HeaderValue::from_str(&config.notion_api_version).map_err(|_| {
                SyncError::configuration("NOTION_API_VERSION is not a valid header value")
            })?,
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .build()
            .map_err(|e| SyncError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.notion_base_url.trim_end_matches('/').to_string(),
            database_id: config.database_id.clone(),
            unique_id_property: config.unique_id_property.clone(),
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, StoreError> {
        let started = tokio::time::Instant::now();
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response.json().await?;
        debug!(
            "Remote call finished with {} in {}ms",
            status,
            started.elapsed().as_millis()
        );
        Ok(value)
    }
}

#[async_trait]
impl PageLocator for NotionStore {
    /// Find the page whose unique-id property equals `unique_id`
    ///
    /// Returns `Ok(None)` when no page matches. When several pages match, the
    /// first one in query order is used.
    async fn find_page_by_unique_id(&self, unique_id: u64) -> Result<Option<String>, StoreError> {
        let url = format!("{}/databases/{}/query", self.base_url, self.database_id);
        let body = json!({
            "filter": {
                "property": self.unique_id_property,
                "unique_id": { "equals": unique_id }
            }
        });

        let response = self.send(self.client.post(url).json(&body)).await?;
        let page: ListPage =
            serde_json::from_value(response).map_err(|e| StoreError::decode(e.to_string()))?;

        if page.results.len() > 1 {
            warn!(
                "Multiple pages found with unique id {}; using the first one",
                unique_id
            );
        }

        let Some(first) = page.results.first() else {
            warn!("No page found with unique id {}", unique_id);
            return Ok(None);
        };

        let page_id = first
            .get("id")
            .and_then(Value::as_str)
            .ok_or_else(|| StoreError::decode("query result without id"))?;
        info!("Found page {} for unique id {}", page_id, unique_id);
        Ok(Some(page_id.to_string()))
    }
}

#[async_trait]
impl TreeStore for NotionStore {
    async fn list_children(&self, block_id: &str) -> Result<Vec<RemoteBlock>, StoreError> {
        let url = format!("{}/blocks/{}/children", self.base_url, block_id);
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut request = self
                .client
                .get(&url)
                .query(&[("page_size", LIST_PAGE_SIZE)]);
            if let Some(start) = &cursor {
                request = request.query(&[("start_cursor", start.as_str())]);
            }

            let page: ListPage = serde_json::from_value(self.send(request).await?)
                .map_err(|e| StoreError::decode(e.to_string()))?;

            for raw in page.results {
                let block = RemoteBlock::from_payload(raw)
                    .ok_or_else(|| StoreError::decode("child block without id or type"))?;
                blocks.push(block);
            }

            match (page.has_more, page.next_cursor) {
                (true, Some(next)) => cursor = Some(next),
                _ => break,
            }
        }

        debug!("Listed {} children of {}", blocks.len(), block_id);
        Ok(blocks)
    }

    async fn create_children(
        &self,
        parent_id: &str,
        specs: &[BlockSpec],
    ) -> Result<Vec<String>, StoreError> {
        let url = format!("{}/blocks/{}/children", self.base_url, parent_id);
        let mut created = Vec::with_capacity(specs.len());

        for batch in specs.chunks(MAX_CHILDREN_PER_REQUEST) {
            let children: Vec<Value> = batch.iter().map(BlockSpec::to_payload).collect();
            let response = self
                .send(self.client.patch(&url).json(&json!({ "children": children })))
                .await?;
            let page: ListPage =
                serde_json::from_value(response).map_err(|e| StoreError::decode(e.to_string()))?;

            // The response lists the newly created first-level children
            let ids = page
                .results
                .iter()
                .map(|block| block.get("id").and_then(Value::as_str).map(str::to_string))
                .collect::<Option<Vec<String>>>()
                .ok_or_else(|| StoreError::decode("created block without id"))?;
            if ids.len() != batch.len() {
                return Err(StoreError::decode(format!(
                    "appended {} blocks but response listed {}",
                    batch.len(),
                    ids.len()
                )));
            }
            created.extend(ids);
        }

        info!("Appended {} blocks to {}", created.len(), parent_id);
        Ok(created)
    }

    async fn delete_block(&self, block_id: &str) -> Result<(), StoreError> {
        let url = format!("{}/blocks/{}", self.base_url, block_id);
        self.send(self.client.delete(url)).await?;
        debug!("Deleted block {}", block_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_api_key() {
        let result = NotionStore::new(&DigestConfig::default());
        assert!(matches!(result, Err(SyncError::Configuration(_))));
    }

    #[test]
    fn test_rejects_unprintable_api_key() {
        let config = DigestConfig {
            notion_api_key: "bad\nkey".to_string(),
            ..DigestConfig::default()
        };
        assert!(matches!(
            NotionStore::new(&config),
            Err(SyncError::Configuration(_))
        ));
    }

    #[test]
    fn test_trailing_slash_is_trimmed_from_base_url() {
        let config = DigestConfig {
            notion_api_key: "secret".to_string(),
            notion_base_url: "http://localhost:9999/v1/".to_string(),
            ..DigestConfig::default()
        };
        let store = NotionStore::new(&config).unwrap();
        assert_eq!(store.base_url, "http://localhost:9999/v1");
    }

    #[test]
    fn test_list_page_defaults() {
        let page: ListPage = serde_json::from_value(json!({ "results": [] })).unwrap();
        assert!(!page.has_more);
        assert!(page.next_cursor.is_none());
    }
}
