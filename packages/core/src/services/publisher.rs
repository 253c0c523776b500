//! Summary Publisher
//!
//! End-to-end entry point: render generated markdown and reconcile it into a
//! labeled section of a page. The section label is always supplied by the
//! caller; [`SectionKind`] only selects which configured default to use.

use crate::config::DigestConfig;
use crate::error::SyncError;
use crate::markdown::markdown_to_blocks;
use crate::models::{ContainerKind, ContainerPath, RenderableBlock};
use crate::services::reconciler::{ReconcileReport, SectionReconciler};
use crate::store::{PageLocator, TreeStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::instrument;

/// Which kind of generated content a section holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    #[default]
    Summary,
    Minutes,
}

impl SectionKind {
    /// Configured default label for this kind
    pub fn default_label<'a>(&self, config: &'a DigestConfig) -> &'a str {
        match self {
            SectionKind::Summary => &config.summary_label,
            SectionKind::Minutes => &config.minutes_label,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SectionKind::Summary => f.write_str("summary"),
            SectionKind::Minutes => f.write_str("minutes"),
        }
    }
}

impl FromStr for SectionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "summary" => Ok(SectionKind::Summary),
            "minutes" => Ok(SectionKind::Minutes),
            other => Err(format!(
                "unknown section kind '{}' (expected summary or minutes)",
                other
            )),
        }
    }
}

/// Outcome of one publish call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    pub root_id: String,
    pub label: String,
    /// Number of blocks written (1 for an empty input: the placeholder)
    pub block_count: usize,
    #[serde(flatten)]
    pub reconcile: ReconcileReport,
}

pub struct SummaryPublisher {
    reconciler: SectionReconciler,
    max_chunk_len: usize,
}

impl SummaryPublisher {
    pub fn new(store: Arc<dyn TreeStore>, max_chunk_len: usize) -> Self {
        Self {
            reconciler: SectionReconciler::new(store),
            max_chunk_len,
        }
    }

    pub fn from_config(store: Arc<dyn TreeStore>, config: &DigestConfig) -> Self {
        Self::new(store, config.max_chunk_len)
    }

    /// Render `markdown`, substituting one empty paragraph for an empty result
    pub fn render(&self, markdown: &str) -> Vec<RenderableBlock> {
        let blocks = markdown_to_blocks(markdown, self.max_chunk_len);
        if blocks.is_empty() {
            vec![RenderableBlock::placeholder()]
        } else {
            blocks
        }
    }

    /// Replace the body of section `label` inside the `container` of `root_id`
    #[instrument(skip(self, markdown), fields(markdown_chars = markdown.chars().count()))]
    pub async fn publish(
        &self,
        root_id: &str,
        container: ContainerKind,
        label: &str,
        markdown: &str,
    ) -> Result<PublishReport, SyncError> {
        let blocks = self.render(markdown);
        tracing::debug!("Rendered {} blocks for section '{}'", blocks.len(), label);

        let path = ContainerPath::new(root_id, container, label);
        let reconcile = self.reconciler.reconcile(&path, &blocks).await?;

        Ok(PublishReport {
            root_id: root_id.to_string(),
            label: label.to_string(),
            block_count: blocks.len(),
            reconcile,
        })
    }

    /// Resolve the page carrying `unique_id`, then [`publish`](Self::publish) into it
    #[instrument(skip(self, locator, markdown))]
    pub async fn publish_for_unique_id(
        &self,
        locator: &dyn PageLocator,
        unique_id: u64,
        container: ContainerKind,
        label: &str,
        markdown: &str,
    ) -> Result<PublishReport, SyncError> {
        let page_id = locator
            .find_page_by_unique_id(unique_id)
            .await
            .map_err(|source| SyncError::PageLookupFailed { unique_id, source })?
            .ok_or(SyncError::PageNotFound { unique_id })?;

        self.publish(&page_id, container, label, markdown).await
    }
}
