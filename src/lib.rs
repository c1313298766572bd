// Workspace-scoped editor tabs for SQL studio frontends

// Module declarations
pub mod storage;
pub mod tabs;

pub use storage::{DatabaseManager, KeyValueStore, MemoryStore, StorageError, StorageResult, TabsSettings};
pub use tabs::{
    create_tab_id, CloseContext, EditorFamily, Location, Navigator, RecentItems, Tab, TabEngine,
    TabMetadata, TabType, TabUpdate, TabsState, WorkspaceRegistry, NEW_TAB_ID,
};

use storage::get_default_db_path;

/// Open the tab engine on the database in the app data directory
pub fn open_default_engine() -> StorageResult<TabEngine<DatabaseManager>> {
    let db_path = get_default_db_path()?;
    log::info!("[Startup] Database path: {:?}", db_path);
    let db_manager = DatabaseManager::new(db_path)?;
    TabEngine::open(db_manager)
}
