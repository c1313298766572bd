// Local persistence for UI state
// This module handles the key-value medium that workspace tab state is saved to

pub mod database;
pub mod crud;
pub mod kv;
pub mod state;

pub use database::{DatabaseManager, StorageError, StorageResult, get_default_db_path};
pub use kv::{KeyValueStore, MemoryStore};
pub use state::TabsSettings;
