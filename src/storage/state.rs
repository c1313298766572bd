// Tab settings management
// Handles persistent settings in the app_state table

use serde::{Deserialize, Serialize};

use super::database::{DatabaseManager, StorageResult};

pub const DEFAULT_STORAGE_KEY_PREFIX: &str = "studio_tabs";
pub const DEFAULT_SCHEMA: &str = "public";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabsSettings {
    /// Workspace state is stored under `{storage_key_prefix}_{workspace_ref}`
    pub storage_key_prefix: String,
    /// Schema used for query tabs when the route carries none
    pub default_schema: String,
    /// Batch writes until the host calls `flush`
    pub defer_persistence: bool,
}

impl Default for TabsSettings {
    fn default() -> Self {
        Self {
            storage_key_prefix: DEFAULT_STORAGE_KEY_PREFIX.to_string(),
            default_schema: DEFAULT_SCHEMA.to_string(),
            defer_persistence: false,
        }
    }
}

impl DatabaseManager {
    /// Get a setting value by key
    pub fn get_setting(&self, key: &str) -> StorageResult<Option<String>> {
        self.get_state(key)
    }

    /// Set a setting value by key
    pub fn set_setting(&self, key: &str, value: &str) -> StorageResult<()> {
        self.set_state(key, value)
    }

    /// Get the storage key prefix for workspace tab state
    pub fn get_storage_key_prefix(&self) -> StorageResult<String> {
        let value = self.get_setting("tabs_storage_key_prefix")?;
        Ok(value
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY_PREFIX.to_string()))
    }

    /// Get the default schema for query tabs
    pub fn get_default_schema(&self) -> StorageResult<String> {
        let value = self.get_setting("tabs_default_schema")?;
        Ok(value
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_SCHEMA.to_string()))
    }

    /// Get deferred persistence setting
    pub fn get_defer_persistence(&self) -> StorageResult<bool> {
        let value = self.get_setting("tabs_defer_persistence")?;
        // Default to false if not set
        Ok(value.as_deref() == Some("true"))
    }

    /// Get tab settings as a struct
    pub fn get_tabs_settings(&self) -> StorageResult<TabsSettings> {
        Ok(TabsSettings {
            storage_key_prefix: self.get_storage_key_prefix()?,
            default_schema: self.get_default_schema()?,
            defer_persistence: self.get_defer_persistence()?,
        })
    }

    /// Update tab settings
    pub fn update_tabs_settings(&self, settings: &TabsSettings) -> StorageResult<()> {
        self.set_setting("tabs_storage_key_prefix", &settings.storage_key_prefix)?;
        self.set_setting("tabs_default_schema", &settings.default_schema)?;
        self.set_setting(
            "tabs_defer_persistence",
            if settings.defer_persistence { "true" } else { "false" },
        )?;
        Ok(())
    }

    /// Initialize default settings if they don't exist
    pub fn init_default_settings(&self) -> StorageResult<()> {
        let defaults = TabsSettings::default();
        if self.get_setting("tabs_storage_key_prefix")?.is_none() {
            self.set_setting("tabs_storage_key_prefix", &defaults.storage_key_prefix)?;
        }
        if self.get_setting("tabs_default_schema")?.is_none() {
            self.set_setting("tabs_default_schema", &defaults.default_schema)?;
        }
        if self.get_setting("tabs_defer_persistence")?.is_none() {
            self.set_setting("tabs_defer_persistence", "false")?;
        }
        Ok(())
    }
}
