// Tab lifecycle engine
// Add, promote, reorder, remove and close tabs of a workspace

use std::borrow::Cow;

use crate::storage::{DatabaseManager, KeyValueStore, StorageResult, TabsSettings};

use super::navigation::{home_location, resolve_tab_location, Navigator};
use super::recent::RecentItems;
use super::registry::WorkspaceRegistry;
use super::state::TabsState;
use super::types::{EditorFamily, Tab, TabType, NEW_TAB_ID};

/// Partial update of a tab's display data. Only fields that are `Some` are
/// written, so an empty label or a zero scroll offset is applied as given.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabUpdate {
    pub label: Option<String>,
    pub scroll_top: Option<f64>,
}

/// Collaborators for closing a tab
pub struct CloseContext<'a> {
    pub navigator: &'a mut dyn Navigator,
    /// Editor panel the close was issued from
    pub editor: Option<EditorFamily>,
    pub on_close: Option<&'a mut dyn FnMut(&str)>,
}

impl<'a> CloseContext<'a> {
    pub fn new(navigator: &'a mut dyn Navigator) -> Self {
        Self {
            navigator,
            editor: None,
            on_close: None,
        }
    }

    pub fn editor(mut self, editor: EditorFamily) -> Self {
        self.editor = Some(editor);
        self
    }

    pub fn on_close(mut self, on_close: &'a mut dyn FnMut(&str)) -> Self {
        self.on_close = Some(on_close);
        self
    }
}

/// Tab lifecycle operations over a [`WorkspaceRegistry`].
///
/// Every operation takes the workspace reference as an `Option`; without one
/// the operation does nothing. Unknown tab ids are ignored as well. Each
/// operation finishes its writes before any collaborator is called.
pub struct TabEngine<S: KeyValueStore, R: RecentItems = ()> {
    registry: WorkspaceRegistry<S>,
    recents: R,
    default_schema: String,
}

impl<S: KeyValueStore> TabEngine<S> {
    pub fn new(store: S, settings: &TabsSettings) -> Self {
        Self::with_recents(store, settings, ())
    }
}

impl TabEngine<DatabaseManager> {
    /// Engine persisting to `db`, configured from the settings stored in it
    pub fn open(db: DatabaseManager) -> StorageResult<Self> {
        db.init_default_settings()?;
        let settings = db.get_tabs_settings()?;
        log::debug!("[Tabs] Opening tab engine with {:?}", settings);
        Ok(Self::new(db, &settings))
    }
}

impl<S: KeyValueStore, R: RecentItems> TabEngine<S, R> {
    pub fn with_recents(store: S, settings: &TabsSettings, recents: R) -> Self {
        Self {
            registry: WorkspaceRegistry::new(store, settings),
            recents,
            default_schema: settings.default_schema.clone(),
        }
    }

    pub fn registry(&self) -> &WorkspaceRegistry<S> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut WorkspaceRegistry<S> {
        &mut self.registry
    }

    pub fn recents(&self) -> &R {
        &self.recents
    }

    /// Current state of a workspace (an ephemeral default without a reference)
    pub fn state(&mut self, workspace_ref: Option<&str>) -> Cow<'_, TabsState> {
        self.registry.get(workspace_ref)
    }

    /// Write any deferred change
    pub fn flush(&mut self) {
        self.registry.flush();
    }

    /// Open a tab, or focus it if it is already open.
    ///
    /// A tab not explicitly marked permanent opens as the preview tab and
    /// replaces any existing preview.
    pub fn add_tab(&mut self, workspace_ref: Option<&str>, tab: Tab) {
        let Some(workspace_ref) = workspace_ref else {
            return;
        };

        let record = self.registry.update(workspace_ref, |state| {
            if state.contains(&tab.id) {
                if state.is_active(&tab.id) {
                    return false;
                }
                state.active_tab = Some(tab.id.clone());
                return !tab.is_preview();
            }

            if tab.is_preview == Some(false) {
                state.open_tabs.push(tab.id.clone());
                state.tabs_map.insert(tab.id.clone(), tab.clone());
                state.active_tab = Some(tab.id.clone());
                return true;
            }

            if let Some(previous) = state.preview_tab_id.take() {
                log::debug!("[Tabs] Replacing preview tab {} with {}", previous, tab.id);
                state.open_tabs.retain(|id| *id != previous);
                state.tabs_map.remove(&previous);
            }

            let mut preview = tab.clone();
            preview.is_preview = Some(true);
            state.tabs_map.insert(tab.id.clone(), preview);
            state.open_tabs.push(tab.id.clone());
            state.preview_tab_id = Some(tab.id.clone());
            state.active_tab = Some(tab.id.clone());
            false
        });

        if record {
            self.recents.record_recent(workspace_ref, &tab);
        }
    }

    /// Remove a tab from the state without navigating.
    ///
    /// If it was active, focus falls to the tab on its left, else the tab that
    /// took its place, else nothing.
    pub fn remove_tab(&mut self, workspace_ref: Option<&str>, id: &str) {
        let Some(workspace_ref) = workspace_ref else {
            return;
        };

        self.registry
            .update(workspace_ref, |state| remove_from_state(state, id));
    }

    /// Remove tabs one by one, in the given order, committing once
    pub fn remove_tabs(&mut self, workspace_ref: Option<&str>, ids: &[String]) {
        let Some(workspace_ref) = workspace_ref else {
            return;
        };
        if ids.is_empty() {
            return;
        }

        self.registry.update(workspace_ref, |state| {
            for id in ids {
                remove_from_state(state, id);
            }
        });
    }

    /// Update a tab's label and scroll offset in place.
    ///
    /// The scroll offset is only kept for tabs that carry metadata.
    pub fn update_tab(&mut self, workspace_ref: Option<&str>, id: &str, update: TabUpdate) {
        let Some(workspace_ref) = workspace_ref else {
            return;
        };

        self.registry.update(workspace_ref, |state| {
            let Some(tab) = state.tabs_map.get_mut(id) else {
                return;
            };
            let mut touched = false;
            if let Some(label) = update.label {
                tab.label = Some(label);
                touched = true;
            }
            if let (Some(scroll_top), Some(metadata)) = (update.scroll_top, tab.metadata.as_mut()) {
                metadata.scroll_top = Some(scroll_top);
                touched = true;
            }
            if touched {
                tab.updated_at = Some(chrono::Utc::now());
            }
        });
    }

    /// Move the tab at `old_index` to `new_index`.
    ///
    /// Callers pass indices within `open_tabs`. An out-of-range `old_index` is
    /// ignored and `new_index` is clamped to the end.
    pub fn reorder_tabs(&mut self, workspace_ref: Option<&str>, old_index: usize, new_index: usize) {
        let Some(workspace_ref) = workspace_ref else {
            return;
        };

        self.registry.update(workspace_ref, |state| {
            if old_index >= state.open_tabs.len() {
                log::debug!("[Tabs] Ignoring reorder from out-of-range index {}", old_index);
                return;
            }
            let moved = state.open_tabs.remove(old_index);
            let new_index = new_index.min(state.open_tabs.len());
            state.open_tabs.insert(new_index, moved);
        });
    }

    /// Promote the preview tab `tab_id` to a permanent tab
    pub fn make_tab_permanent(&mut self, workspace_ref: Option<&str>, tab_id: &str) {
        let Some(workspace_ref) = workspace_ref else {
            return;
        };

        let promoted = self.registry.update(workspace_ref, |state| {
            if !promote_preview(state, tab_id) {
                return None;
            }
            state.tabs_map.get(tab_id).cloned()
        });

        if let Some(tab) = promoted {
            log::debug!("[Tabs] Promoted preview tab {}", tab.id);
            self.recents.record_recent(workspace_ref, &tab);
        }
    }

    /// Promote the active tab if it is a preview. Returns whether it was.
    pub fn make_active_tab_permanent(&mut self, workspace_ref: Option<&str>) -> bool {
        let Some(workspace_ref) = workspace_ref else {
            return false;
        };

        let active = {
            let state = self.registry.get(Some(workspace_ref));
            state.active().filter(|t| t.is_preview()).map(|t| t.id.clone())
        };
        let Some(active) = active else {
            return false;
        };
        self.make_tab_permanent(Some(workspace_ref), &active);
        true
    }

    /// Focus a tab and navigate to its editor
    pub fn navigate_to_tab(
        &mut self,
        workspace_ref: Option<&str>,
        id: &str,
        navigator: &mut dyn Navigator,
    ) {
        let Some(workspace_ref) = workspace_ref else {
            return;
        };
        if !self.registry.get(Some(workspace_ref)).contains(id) {
            return;
        }

        let Some(tab) = self.registry.update(workspace_ref, |state| {
            let tab = state.tabs_map.get(id)?.clone();
            state.active_tab = Some(id.to_string());
            Some(tab)
        }) else {
            return;
        };

        self.follow_tab(workspace_ref, &tab, navigator);
    }

    /// Record a visit to `tab` and hand its location to the navigator. The
    /// state is not touched; callers have already focused the tab.
    fn follow_tab(&mut self, workspace_ref: &str, tab: &Tab, navigator: &mut dyn Navigator) {
        if !tab.is_preview() {
            self.recents.record_recent(workspace_ref, tab);
        }

        let schema = navigator.current_schema();
        match resolve_tab_location(workspace_ref, tab, schema.as_deref(), &self.default_schema) {
            Some(location) => navigator.navigate(location),
            None => log::debug!("[Tabs] No navigation target for tab {}", tab.id),
        }
    }

    /// Close a tab the user dismissed.
    ///
    /// When the closed tab had focus (or is the [`NEW_TAB_ID`] placeholder),
    /// focus moves to the first other open tab of the same editor family, or
    /// to that editor's home page when there is none. Tabs of the other family
    /// are never picked, so focus stays in the same panel.
    pub fn close_tab(&mut self, workspace_ref: Option<&str>, id: &str, context: CloseContext<'_>) {
        let Some(workspace_ref) = workspace_ref else {
            return;
        };
        let CloseContext {
            navigator,
            editor,
            on_close,
        } = context;

        let (closed, next_tab, should_navigate) = self.registry.update(workspace_ref, |state| {
            let closed = state.tabs_map.remove(id);
            let family = closed.as_ref().map(Tab::family).or(editor);
            state.open_tabs.retain(|tab_id| tab_id != id);
            if state.preview_tab_id.as_deref() == Some(id) {
                state.preview_tab_id = None;
            }

            let should_navigate = state.is_active(id) || id == NEW_TAB_ID;
            if !should_navigate {
                return (closed, None, false);
            }

            let next_tab = family.and_then(|family| {
                state
                    .tabs()
                    .find(|tab| tab.family() == family)
                    .cloned()
            });
            if next_tab.is_some() || state.is_active(id) {
                state.active_tab = next_tab.as_ref().map(|tab| tab.id.clone());
            }
            (closed, next_tab, true)
        });

        if should_navigate {
            match next_tab {
                Some(next_tab) => self.follow_tab(workspace_ref, &next_tab, navigator),
                None => {
                    navigator.clear_history();
                    let closed_type: Option<TabType> = closed.as_ref().map(|t| t.tab_type);
                    navigator.navigate(home_location(workspace_ref, closed_type, editor));
                }
            }
        }

        if let Some(on_close) = on_close {
            on_close(id);
        }
    }

    /// Finish a drag: promote the dragged tab, move it to `new_index`, focus it
    /// and navigate to it.
    ///
    /// The tab is taken from its actual position; `old_index` only serves as a
    /// consistency check.
    pub fn handle_tab_drag_end(
        &mut self,
        workspace_ref: Option<&str>,
        old_index: usize,
        new_index: usize,
        tab_id: &str,
        navigator: &mut dyn Navigator,
    ) {
        let Some(workspace_ref) = workspace_ref else {
            return;
        };

        let dragged = self.registry.update(workspace_ref, |state| {
            let position = state.index_of(tab_id)?;
            if position != old_index {
                log::debug!(
                    "[Tabs] Drag of {} reported index {}, found at {}",
                    tab_id,
                    old_index,
                    position
                );
            }
            let promoted = promote_preview(state, tab_id);
            let moved = state.open_tabs.remove(position);
            let new_index = new_index.min(state.open_tabs.len());
            state.open_tabs.insert(new_index, moved);
            state.active_tab = Some(tab_id.to_string());
            let tab = state.tabs_map.get(tab_id)?.clone();
            Some((tab, promoted))
        });

        if let Some((tab, promoted)) = dragged {
            if promoted {
                log::debug!("[Tabs] Promoted preview tab {}", tab.id);
                self.recents.record_recent(workspace_ref, &tab);
            }
            self.follow_tab(workspace_ref, &tab, navigator);
        }
    }

    /// Remove every open tab that belongs to `family`
    pub fn remove_tabs_by_editor(&mut self, workspace_ref: Option<&str>, family: EditorFamily) {
        let Some(workspace_ref) = workspace_ref else {
            return;
        };

        let ids: Vec<String> = {
            let state = self.registry.get(Some(workspace_ref));
            state
                .open_tabs
                .iter()
                .filter(|id| {
                    state
                        .tab(id)
                        .map(|tab| tab.tab_type)
                        .or_else(|| TabType::from_tab_id(id))
                        .is_some_and(|tab_type| family.contains(tab_type))
                })
                .cloned()
                .collect()
        };

        self.remove_tabs(Some(workspace_ref), &ids);
    }
}

/// Drop `id` from the state, moving focus left, else right, when it was active
fn remove_from_state(state: &mut TabsState, id: &str) {
    let index = state.index_of(id);
    state.open_tabs.retain(|tab_id| tab_id != id);
    state.tabs_map.remove(id);
    if state.preview_tab_id.as_deref() == Some(id) {
        state.preview_tab_id = None;
    }

    if state.is_active(id) {
        let next = match index {
            Some(index) => index
                .checked_sub(1)
                .and_then(|prev| state.open_tabs.get(prev))
                .or_else(|| state.open_tabs.get(index)),
            None => state.open_tabs.first(),
        };
        state.active_tab = next.cloned();
    }
}

/// Clear the preview flag of `tab_id` if it is the preview tab
fn promote_preview(state: &mut TabsState, tab_id: &str) -> bool {
    if state.preview_tab_id.as_deref() != Some(tab_id) {
        return false;
    }
    let Some(tab) = state.tabs_map.get_mut(tab_id).filter(|t| t.is_preview()) else {
        return false;
    };
    tab.is_preview = Some(false);
    state.preview_tab_id = None;
    true
}
