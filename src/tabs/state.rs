// Per-workspace tab state and its persisted form

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

use super::types::Tab;

/// Open tabs of a single workspace.
///
/// `open_tabs` holds the display order and `tabs_map` the tab data; the two
/// always cover the same ids. At most one tab is a preview, and it is the one
/// `preview_tab_id` names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabsState {
    #[serde(default)]
    pub active_tab: Option<String>,
    pub open_tabs: Vec<String>,
    pub tabs_map: HashMap<String, Tab>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_tab_id: Option<String>,
}

impl TabsState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted state, returning `None` when it cannot be trusted.
    ///
    /// Only the shape is checked up front: `openTabs` must be an array and
    /// `tabsMap` an object. Entries that fail to parse are dropped one by one
    /// and the rest is repaired with [`TabsState::sanitize`].
    pub fn from_persisted(raw: &str) -> Option<Self> {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("[Tabs] Failed to parse stored tabs: {}", e);
                return None;
            }
        };

        let (Some(open_tabs), Some(tabs_map)) = (
            value.get("openTabs").and_then(Value::as_array),
            value.get("tabsMap").and_then(Value::as_object),
        ) else {
            log::warn!("[Tabs] Invalid stored data, using default");
            return None;
        };

        let mut state = TabsState {
            active_tab: string_field(&value, "activeTab"),
            open_tabs: open_tabs
                .iter()
                .filter_map(|id| id.as_str().map(str::to_string))
                .collect(),
            tabs_map: HashMap::with_capacity(tabs_map.len()),
            preview_tab_id: string_field(&value, "previewTabId"),
        };
        for (key, entry) in tabs_map {
            match Tab::deserialize(entry) {
                Ok(tab) => {
                    state.tabs_map.insert(key.clone(), tab);
                }
                Err(e) => log::warn!("[Tabs] Dropping stored tab {}: {}", key, e),
            }
        }

        if state.sanitize() {
            log::debug!("[Tabs] Repaired inconsistent stored tabs");
        }
        Some(state)
    }

    pub fn to_persisted(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.tabs_map.contains_key(id)
    }

    pub fn tab(&self, id: &str) -> Option<&Tab> {
        self.tabs_map.get(id)
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.open_tabs.iter().position(|t| t == id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_tab.as_deref() == Some(id)
    }

    pub fn active(&self) -> Option<&Tab> {
        self.active_tab.as_deref().and_then(|id| self.tabs_map.get(id))
    }

    pub fn preview(&self) -> Option<&Tab> {
        self.preview_tab_id.as_deref().and_then(|id| self.tabs_map.get(id))
    }

    /// Tabs in display order
    pub fn tabs(&self) -> impl Iterator<Item = &Tab> {
        self.open_tabs.iter().filter_map(|id| self.tabs_map.get(id))
    }

    pub fn len(&self) -> usize {
        self.open_tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open_tabs.is_empty()
    }

    /// Whether the ordering, preview and active-tab invariants all hold
    pub fn is_consistent(&self) -> bool {
        let mut seen = HashSet::new();
        let unique_and_known = self
            .open_tabs
            .iter()
            .all(|id| seen.insert(id.as_str()) && self.tabs_map.contains_key(id));
        if !unique_and_known || seen.len() != self.tabs_map.len() {
            return false;
        }
        if self.tabs_map.iter().any(|(key, tab)| *key != tab.id) {
            return false;
        }

        let previews: Vec<&str> = self
            .tabs_map
            .values()
            .filter(|t| t.is_preview())
            .map(|t| t.id.as_str())
            .collect();
        let preview_ok = match self.preview_tab_id.as_deref() {
            Some(id) => previews == [id],
            None => previews.is_empty(),
        };

        let active_ok = self
            .active_tab
            .as_deref()
            .map_or(true, |id| self.tabs_map.contains_key(id));

        preview_ok && active_ok
    }

    /// Restore the invariants on state read from outside. Returns whether
    /// anything had to change.
    ///
    /// Duplicate and unknown ids are dropped from `open_tabs`, tabs that are not
    /// open are dropped from `tabs_map`, stray preview flags are cleared and a
    /// dangling active tab is unset.
    pub fn sanitize(&mut self) -> bool {
        let before = self.clone();

        self.tabs_map.retain(|key, tab| *key == tab.id);

        let mut seen = HashSet::new();
        let tabs_map = &self.tabs_map;
        self.open_tabs
            .retain(|id| tabs_map.contains_key(id) && seen.insert(id.clone()));
        self.tabs_map.retain(|id, _| seen.contains(id));

        let preview_valid = self
            .preview_tab_id
            .as_deref()
            .and_then(|id| self.tabs_map.get(id))
            .is_some_and(Tab::is_preview);
        if !preview_valid {
            self.preview_tab_id = None;
        }
        let preview_id = self.preview_tab_id.clone();
        for tab in self.tabs_map.values_mut() {
            if tab.is_preview() && Some(&tab.id) != preview_id.as_ref() {
                tab.is_preview = Some(false);
            }
        }

        if self
            .active_tab
            .as_deref()
            .is_some_and(|id| !self.tabs_map.contains_key(id))
        {
            self.active_tab = None;
        }

        *self != before
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_string)
}
