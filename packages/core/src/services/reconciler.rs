//! Section Reconciler
//!
//! Makes one labeled section under a root hold exactly a given list of blocks,
//! leaving everything else in the tree alone:
//!
//! ```text
//! root
//! └── container (first child of the configured type; created if absent)
//!     └── section (toggleable heading_3 whose label matches exactly)
//!         └── rendered blocks (previous children deleted, new ones appended)
//! ```
//!
//! Running twice with the same input leaves the same container and section ids
//! in place and the same body under them. Failures while deleting individual
//! old children are collected in the report instead of aborting the run, so a
//! partially failed clear still ends with the new content appended after
//! whatever could not be removed.

use crate::error::SyncError;
use crate::models::{BlockSpec, ContainerPath, RenderableBlock};
use crate::store::TreeStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::instrument;

/// Result of deleting one previous section child
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeleteOutcome {
    Deleted { block_id: String },
    Failed { block_id: String, error: String },
}

impl DeleteOutcome {
    pub fn block_id(&self) -> &str {
        match self {
            DeleteOutcome::Deleted { block_id } | DeleteOutcome::Failed { block_id, .. } => {
                block_id
            }
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, DeleteOutcome::Failed { .. })
    }
}

/// What a reconciliation run found, created and changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconcileReport {
    pub container_id: String,
    pub container_created: bool,
    pub section_id: String,
    pub section_created: bool,
    /// One entry per previous child, in listing order
    pub deletions: Vec<DeleteOutcome>,
    /// Ids of the appended blocks, in input order
    pub appended_ids: Vec<String>,
}

impl ReconcileReport {
    /// Number of previous children that could not be deleted
    pub fn delete_failures(&self) -> usize {
        self.deletions.iter().filter(|d| d.is_failed()).count()
    }

    /// Number of previous children that were deleted
    pub fn deleted_count(&self) -> usize {
        self.deletions.len() - self.delete_failures()
    }
}

/// Idempotent find-or-create-then-replace over a [`TreeStore`]
pub struct SectionReconciler {
    store: Arc<dyn TreeStore>,
}

impl SectionReconciler {
    pub fn new(store: Arc<dyn TreeStore>) -> Self {
        Self { store }
    }

    /// Replace the body of the section at `path` with `blocks`
    ///
    /// # Errors
    ///
    /// - [`SyncError::RemoteLookupFailed`] when any listing fails
    /// - [`SyncError::RemoteCreateFailed`] when the container or section
    ///   cannot be created
    /// - [`SyncError::RemoteAppendFailed`] when appending `blocks` fails
    ///
    /// Individual delete failures are not errors; see
    /// [`ReconcileReport::deletions`].
    #[instrument(
        skip(self, path, blocks),
        fields(root_id = %path.root_id, container = %path.container, label = %path.section_label)
    )]
    pub async fn reconcile(
        &self,
        path: &ContainerPath,
        blocks: &[RenderableBlock],
    ) -> Result<ReconcileReport, SyncError> {
        let (container_id, container_created) = self.find_or_create_container(path).await?;
        let (section_id, section_created) = self
            .find_or_create_section(&container_id, &path.section_label)
            .await?;

        let deletions = self.clear_section(&section_id).await?;

        let appended_ids = if blocks.is_empty() {
            Vec::new()
        } else {
            let specs: Vec<BlockSpec> = blocks.iter().cloned().map(BlockSpec::from).collect();
            self.store
                .create_children(&section_id, &specs)
                .await
                .map_err(|e| SyncError::append_failed(&section_id, e))?
        };

        let report = ReconcileReport {
            container_id,
            container_created,
            section_id,
            section_created,
            deletions,
            appended_ids,
        };
        tracing::info!(
            "Reconciled section '{}': {} deleted, {} failed deletes, {} appended",
            path.section_label,
            report.deleted_count(),
            report.delete_failures(),
            report.appended_ids.len()
        );
        Ok(report)
    }

    async fn find_or_create_container(
        &self,
        path: &ContainerPath,
    ) -> Result<(String, bool), SyncError> {
        let type_name = path.container.type_name();
        let children = self
            .store
            .list_children(&path.root_id)
            .await
            .map_err(|e| SyncError::lookup_failed(&path.root_id, e))?;

        // First match wins; later containers of the same type are left alone
        if let Some(existing) = children.iter().find(|b| b.block_type == type_name) {
            tracing::debug!("Found existing {} container: {}", type_name, existing.id);
            return Ok((existing.id.clone(), false));
        }

        let id = self
            .create_one(&path.root_id, BlockSpec::Container(path.container), "container")
            .await?;
        tracing::info!("Created {} container {} under {}", type_name, id, path.root_id);
        Ok((id, true))
    }

    async fn find_or_create_section(
        &self,
        container_id: &str,
        label: &str,
    ) -> Result<(String, bool), SyncError> {
        let children = self
            .store
            .list_children(container_id)
            .await
            .map_err(|e| SyncError::lookup_failed(container_id, e))?;

        if let Some(existing) = children.iter().find(|b| b.section_label() == Some(label)) {
            tracing::debug!("Found existing section '{}': {}", label, existing.id);
            return Ok((existing.id.clone(), false));
        }

        let spec = BlockSpec::Section {
            label: label.to_string(),
        };
        let id = self.create_one(container_id, spec, "section").await?;
        tracing::info!("Created section '{}' ({}) under {}", label, id, container_id);
        Ok((id, true))
    }

    async fn clear_section(&self, section_id: &str) -> Result<Vec<DeleteOutcome>, SyncError> {
        let children = self
            .store
            .list_children(section_id)
            .await
            .map_err(|e| SyncError::lookup_failed(section_id, e))?;

        let mut outcomes = Vec::with_capacity(children.len());
        for child in children {
            match self.store.delete_block(&child.id).await {
                Ok(()) => outcomes.push(DeleteOutcome::Deleted { block_id: child.id }),
                Err(e) => {
                    tracing::warn!("Failed to delete block {}: {}", child.id, e);
                    outcomes.push(DeleteOutcome::Failed {
                        block_id: child.id,
                        error: e.to_string(),
                    });
                }
            }
        }
        Ok(outcomes)
    }

    async fn create_one(
        &self,
        parent_id: &str,
        spec: BlockSpec,
        what: &'static str,
    ) -> Result<String, SyncError> {
        let mut ids = self
            .store
            .create_children(parent_id, std::slice::from_ref(&spec))
            .await
            .map_err(|e| SyncError::create_failed(parent_id, what, e))?;

        ids.pop().ok_or_else(|| {
            SyncError::create_failed(
                parent_id,
                what,
                crate::store::StoreError::decode("store returned no id for created block"),
            )
        })
    }
}
