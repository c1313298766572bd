// Workspace state registry
// Owns one TabsState per workspace reference, materialized on first access

use std::borrow::Cow;
use std::collections::HashMap;

use crate::storage::{KeyValueStore, TabsSettings};

use super::notifier::ChangeNotifier;
use super::persistence::WorkspaceStore;
use super::state::TabsState;

/// Registry of tab state for every workspace the session has touched
pub struct WorkspaceRegistry<S: KeyValueStore> {
    states: HashMap<String, TabsState>,
    notifier: ChangeNotifier<S>,
}

impl<S: KeyValueStore> WorkspaceRegistry<S> {
    pub fn new(store: S, settings: &TabsSettings) -> Self {
        let store = WorkspaceStore::new(store, settings.storage_key_prefix.clone());
        Self {
            states: HashMap::new(),
            notifier: ChangeNotifier::new(store, settings.defer_persistence),
        }
    }

    /// State for `workspace_ref`, loading it on first access.
    ///
    /// Without a reference a fresh default state is returned that belongs to no
    /// workspace and is never persisted.
    pub fn get(&mut self, workspace_ref: Option<&str>) -> Cow<'_, TabsState> {
        match workspace_ref {
            Some(workspace_ref) => Cow::Borrowed(self.materialize(workspace_ref)),
            None => Cow::Owned(TabsState::default()),
        }
    }

    /// Owned copy of a workspace's state
    pub fn snapshot(&mut self, workspace_ref: Option<&str>) -> TabsState {
        self.get(workspace_ref).into_owned()
    }

    /// Apply `f` to the state of `workspace_ref` and publish the result
    pub fn update<T>(&mut self, workspace_ref: &str, f: impl FnOnce(&mut TabsState) -> T) -> T {
        self.materialize(workspace_ref);
        let result = match self.states.get_mut(workspace_ref) {
            Some(state) => f(state),
            None => f(&mut TabsState::default()),
        };
        self.notifier.state_changed(&self.states);
        result
    }

    /// References of all materialized workspaces
    pub fn workspace_refs(&self) -> Vec<&str> {
        let mut refs: Vec<&str> = self.states.keys().map(String::as_str).collect();
        refs.sort_unstable();
        refs
    }

    pub fn is_loaded(&self, workspace_ref: &str) -> bool {
        self.states.contains_key(workspace_ref)
    }

    /// Write any deferred change
    pub fn flush(&mut self) {
        self.notifier.flush(&self.states);
    }

    pub fn has_pending_writes(&self) -> bool {
        self.notifier.is_pending()
    }

    /// The key-value medium state is persisted to
    pub fn store(&self) -> &S {
        self.notifier.store().inner()
    }

    fn materialize(&mut self, workspace_ref: &str) -> &TabsState {
        if !self.states.contains_key(workspace_ref) {
            let state = self.notifier.store().load(workspace_ref);
            log::debug!(
                "[Tabs] Materialized workspace {} with {} tabs",
                workspace_ref,
                state.open_tabs.len()
            );
            self.states.insert(workspace_ref.to_string(), state);
            self.notifier.state_changed(&self.states);
        }
        &self.states[workspace_ref]
    }
}
