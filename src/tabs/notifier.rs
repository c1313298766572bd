// Persists committed workspace state after every registry mutation

use std::collections::HashMap;

use crate::storage::KeyValueStore;

use super::persistence::WorkspaceStore;
use super::state::TabsState;

/// Listener the registry calls with its full state map after each commit.
///
/// Writes every workspace's state through the [`WorkspaceStore`]. In deferred
/// mode the write waits for [`ChangeNotifier::flush`]; the map handed to
/// `flush` is the registry's current committed state, never a half-applied one.
pub struct ChangeNotifier<S: KeyValueStore> {
    store: WorkspaceStore<S>,
    deferred: bool,
    pending: bool,
}

impl<S: KeyValueStore> ChangeNotifier<S> {
    pub fn new(store: WorkspaceStore<S>, deferred: bool) -> Self {
        Self {
            store,
            deferred,
            pending: false,
        }
    }

    pub fn store(&self) -> &WorkspaceStore<S> {
        &self.store
    }

    /// Whether a deferred write is waiting for `flush`
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Observe a committed change
    pub fn state_changed(&mut self, states: &HashMap<String, TabsState>) {
        if self.deferred {
            self.pending = true;
        } else {
            self.persist_all(states);
        }
    }

    /// Write any deferred change
    pub fn flush(&mut self, states: &HashMap<String, TabsState>) {
        if self.pending {
            self.persist_all(states);
        }
    }

    fn persist_all(&mut self, states: &HashMap<String, TabsState>) {
        self.pending = false;
        for (workspace_ref, state) in states {
            if let Err(e) = self.store.save(workspace_ref, state) {
                log::error!("[Tabs] Failed to save tabs for {}: {}", workspace_ref, e);
            }
        }
    }
}
