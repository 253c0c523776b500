//! In-memory tree store
//!
//! Ordered block tree kept behind a mutex. Used by tests and by CLI dry runs.
//! Blocks are stored with the same JSON payloads the remote API would return,
//! so section matching behaves exactly as it does against the real store.
//!
//! Failures can be injected per block id to exercise error handling:
//! [`fail_list`](InMemoryTreeStore::fail_list),
//! [`fail_create_under`](InMemoryTreeStore::fail_create_under) and
//! [`fail_delete`](InMemoryTreeStore::fail_delete).

use crate::models::{BlockSpec, RemoteBlock};
use crate::store::{PageLocator, StoreError, TreeStore};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use uuid::Uuid;

#[derive(Debug, Default)]
struct TreeState {
    blocks: HashMap<String, RemoteBlock>,
    children: HashMap<String, Vec<String>>,
    parents: HashMap<String, String>,
    pages: HashMap<u64, String>,
    failing_lists: HashSet<String>,
    failing_creates: HashSet<String>,
    failing_deletes: HashSet<String>,
    delete_calls: Vec<String>,
}

impl TreeState {
    fn remove_subtree(&mut self, block_id: &str) {
        if let Some(children) = self.children.remove(block_id) {
            for child in children {
                self.remove_subtree(&child);
            }
        }
        self.blocks.remove(block_id);
        self.parents.remove(block_id);
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTreeStore {
    state: Arc<Mutex<TreeState>>,
}

impl InMemoryTreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding a single empty root (e.g. a page)
    pub fn with_root(root_id: &str) -> Self {
        let store = Self::new();
        store.add_root(root_id);
        store
    }

    /// Register an empty root block
    pub fn add_root(&self, root_id: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.children.entry(root_id.to_string()).or_default();
        }
    }

    /// Register an empty root page reachable through [`PageLocator`]
    pub fn register_page(&self, unique_id: u64, page_id: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.pages.insert(unique_id, page_id.to_string());
            state.children.entry(page_id.to_string()).or_default();
        }
    }

    /// Append a raw block object under `parent_id`, bypassing [`BlockSpec`]
    ///
    /// Seeds trees the reconciler would never build itself (duplicate
    /// sections, foreign block types). An `id` is generated when absent; an
    /// id already present in the tree is rejected with a 409.
    pub fn insert_raw(&self, parent_id: &str, mut payload: Value) -> Result<String, StoreError> {
        let mut state = self.state()?;
        if !state.children.contains_key(parent_id) {
            return Err(StoreError::not_found(parent_id));
        }
        if payload.get("id").and_then(Value::as_str).is_none() {
            payload["id"] = json!(Uuid::new_v4().to_string());
        }

        let block = RemoteBlock::from_payload(payload)
            .ok_or_else(|| StoreError::decode("raw block lacks type"))?;
        let id = block.id.clone();
        if state.blocks.contains_key(&id) || state.children.contains_key(&id) {
            return Err(StoreError::Http {
                status: 409,
                body: format!("block {} already exists", id),
            });
        }
        state.blocks.insert(id.clone(), block);
        state.children.insert(id.clone(), Vec::new());
        state.parents.insert(id.clone(), parent_id.to_string());
        state
            .children
            .entry(parent_id.to_string())
            .or_default()
            .push(id.clone());
        Ok(id)
    }

    /// Make every `list_children(block_id)` call fail
    pub fn fail_list(&self, block_id: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.failing_lists.insert(block_id.to_string());
        }
    }

    /// Make every `create_children(parent_id, ..)` call fail
    pub fn fail_create_under(&self, parent_id: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.failing_creates.insert(parent_id.to_string());
        }
    }

    /// Make every `delete_block(block_id)` call fail
    pub fn fail_delete(&self, block_id: &str) {
        if let Ok(mut state) = self.state.lock() {
            state.failing_deletes.insert(block_id.to_string());
        }
    }

    /// Snapshot of the direct children of `block_id`
    pub fn children_of(&self, block_id: &str) -> Vec<RemoteBlock> {
        let Ok(state) = self.state.lock() else {
            return Vec::new();
        };
        state
            .children
            .get(block_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| state.blocks.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Whether `block_id` currently exists
    pub fn contains(&self, block_id: &str) -> bool {
        self.state
            .lock()
            .map(|state| state.blocks.contains_key(block_id) || state.children.contains_key(block_id))
            .unwrap_or(false)
    }

    /// Ids passed to `delete_block`, in call order (including failed calls)
    pub fn delete_calls(&self) -> Vec<String> {
        self.state
            .lock()
            .map(|state| state.delete_calls.clone())
            .unwrap_or_default()
    }

    fn state(&self) -> Result<MutexGuard<'_, TreeState>, StoreError> {
        self.state
            .lock()
            .map_err(|_| StoreError::unavailable("Failed to acquire lock"))
    }
}

#[async_trait]
impl TreeStore for InMemoryTreeStore {
    async fn list_children(&self, block_id: &str) -> Result<Vec<RemoteBlock>, StoreError> {
        let state = self.state()?;
        if state.failing_lists.contains(block_id) {
            return Err(StoreError::unavailable(format!(
                "listing {} is failing",
                block_id
            )));
        }

        let ids = state
            .children
            .get(block_id)
            .ok_or_else(|| StoreError::not_found(block_id))?;

        Ok(ids
            .iter()
            .filter_map(|id| state.blocks.get(id).cloned())
            .collect())
    }

    async fn create_children(
        &self,
        parent_id: &str,
        specs: &[BlockSpec],
    ) -> Result<Vec<String>, StoreError> {
        let mut state = self.state()?;
        if state.failing_creates.contains(parent_id) {
            return Err(StoreError::unavailable(format!(
                "creating under {} is failing",
                parent_id
            )));
        }
        if !state.children.contains_key(parent_id) {
            return Err(StoreError::not_found(parent_id));
        }

        let mut created = Vec::with_capacity(specs.len());
        for spec in specs {
            let id = Uuid::new_v4().to_string();
            let mut payload = spec.to_payload();
            payload["id"] = json!(id);
            payload["has_children"] = json!(false);

            let block = RemoteBlock::from_payload(payload)
                .ok_or_else(|| StoreError::decode("encoded block lacks id or type"))?;
            state.blocks.insert(id.clone(), block);
            state.children.insert(id.clone(), Vec::new());
            state.parents.insert(id.clone(), parent_id.to_string());
            created.push(id);
        }

        state
            .children
            .entry(parent_id.to_string())
            .or_default()
            .extend(created.iter().cloned());

        Ok(created)
    }

    async fn delete_block(&self, block_id: &str) -> Result<(), StoreError> {
        let mut state = self.state()?;
        state.delete_calls.push(block_id.to_string());

        if state.failing_deletes.contains(block_id) {
            return Err(StoreError::Http {
                status: 409,
                body: format!("conflict deleting {}", block_id),
            });
        }
        if !state.blocks.contains_key(block_id) {
            return Err(StoreError::not_found(block_id));
        }

        if let Some(parent) = state.parents.get(block_id).cloned() {
            if let Some(siblings) = state.children.get_mut(&parent) {
                siblings.retain(|id| id != block_id);
            }
        }
        state.remove_subtree(block_id);
        Ok(())
    }
}

#[async_trait]
impl PageLocator for InMemoryTreeStore {
    async fn find_page_by_unique_id(&self, unique_id: u64) -> Result<Option<String>, StoreError> {
        let state = self.state()?;
        Ok(state.pages.get(&unique_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ContainerKind, RenderableBlock, StyledRun};

    fn paragraph(text: &str) -> BlockSpec {
        BlockSpec::Content(RenderableBlock::new(
            crate::models::BlockKind::Paragraph,
            vec![StyledRun::plain(text)],
        ))
    }

    #[tokio::test]
    async fn test_create_and_list_preserve_order() {
        let store = InMemoryTreeStore::with_root("page");
        let ids = store
            .create_children("page", &[paragraph("a"), paragraph("b"), paragraph("c")])
            .await
            .unwrap();

        let listed = store.list_children("page").await.unwrap();
        let listed_ids: Vec<String> = listed.iter().map(|b| b.id.clone()).collect();
        assert_eq!(listed_ids, ids);
        assert_eq!(listed[1].plain_text(), "b");
    }

    #[tokio::test]
    async fn test_delete_removes_subtree() {
        let store = InMemoryTreeStore::with_root("page");
        let container = store
            .create_children("page", &[BlockSpec::Container(ContainerKind::Callout)])
            .await
            .unwrap()
            .remove(0);
        let inner = store
            .create_children(&container, &[paragraph("inner")])
            .await
            .unwrap()
            .remove(0);

        store.delete_block(&container).await.unwrap();

        assert!(store.children_of("page").is_empty());
        assert!(!store.contains(&inner));
        assert!(matches!(
            store.list_children(&container).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_unknown_parent_is_not_found() {
        let store = InMemoryTreeStore::new();
        assert!(matches!(
            store.create_children("missing", &[paragraph("x")]).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = InMemoryTreeStore::with_root("page");
        let id = store
            .create_children("page", &[paragraph("keep")])
            .await
            .unwrap()
            .remove(0);

        store.fail_delete(&id);
        store.fail_list("page");

        assert!(store.delete_block(&id).await.is_err());
        assert!(store.list_children("page").await.is_err());
        assert!(store.contains(&id));
        assert_eq!(store.delete_calls(), vec![id]);
    }

    #[tokio::test]
    async fn test_insert_raw_keeps_given_id() {
        let store = InMemoryTreeStore::with_root("page");
        let id = store
            .insert_raw("page", json!({ "id": "raw-1", "type": "divider", "divider": {} }))
            .unwrap();
        assert_eq!(id, "raw-1");

        let generated = store
            .insert_raw("page", json!({ "type": "divider", "divider": {} }))
            .unwrap();
        let listed = store.list_children("page").await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[1].id, generated);
        assert!(store.insert_raw("missing", json!({ "type": "divider" })).is_err());
    }

    #[tokio::test]
    async fn test_insert_raw_rejects_existing_id() {
        let store = InMemoryTreeStore::with_root("page");
        let section = store
            .insert_raw("page", json!({ "id": "dup", "type": "toggle", "toggle": {} }))
            .unwrap();
        store
            .insert_raw(&section, json!({ "type": "divider", "divider": {} }))
            .unwrap();

        let again = store.insert_raw("page", json!({ "id": "dup", "type": "divider" }));
        assert!(matches!(again, Err(StoreError::Http { status: 409, .. })));
        assert!(matches!(
            store.insert_raw("page", json!({ "id": "page", "type": "divider" })),
            Err(StoreError::Http { status: 409, .. })
        ));

        let listed = store.list_children("page").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(store.children_of("dup").len(), 1);
    }

    #[tokio::test]
    async fn test_registered_pages_are_located() {
        let store = InMemoryTreeStore::new();
        store.register_page(42, "page-42");

        assert_eq!(
            store.find_page_by_unique_id(42).await.unwrap().as_deref(),
            Some("page-42")
        );
        assert_eq!(store.find_page_by_unique_id(7).await.unwrap(), None);
        assert!(store.children_of("page-42").is_empty());
        assert!(store.contains("page-42"));
    }
}
