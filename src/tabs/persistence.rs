// Workspace tab state persistence over a key-value medium

use crate::storage::{KeyValueStore, StorageResult};

use super::state::TabsState;

/// Reads and writes one serialized `TabsState` per workspace reference
pub struct WorkspaceStore<S: KeyValueStore> {
    store: S,
    key_prefix: String,
}

impl<S: KeyValueStore> WorkspaceStore<S> {
    pub fn new(store: S, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    /// Storage key for a workspace reference
    pub fn storage_key(&self, workspace_ref: &str) -> String {
        format!("{}_{}", self.key_prefix, workspace_ref)
    }

    /// Load the state saved for `workspace_ref`.
    ///
    /// Missing, unreadable or malformed records all yield the default state.
    pub fn load(&self, workspace_ref: &str) -> TabsState {
        let stored = match self.store.get_value(&self.storage_key(workspace_ref)) {
            Ok(stored) => stored,
            Err(e) => {
                log::error!("[Tabs] Failed to read stored tabs for {}: {}", workspace_ref, e);
                None
            }
        };
        log::debug!("[Tabs] Loading stored tabs for {}: {:?}", workspace_ref, stored);

        stored
            .as_deref()
            .and_then(TabsState::from_persisted)
            .unwrap_or_default()
    }

    /// Serialize and write the state for `workspace_ref`
    pub fn save(&self, workspace_ref: &str, state: &TabsState) -> StorageResult<()> {
        let serialized = state.to_persisted()?;
        self.store
            .set_value(&self.storage_key(workspace_ref), &serialized)
    }

    /// The underlying medium
    pub fn inner(&self) -> &S {
        &self.store
    }
}
