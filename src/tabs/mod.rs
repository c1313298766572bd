// Workspace tab lifecycle
// Tabs are keyed by workspace reference and persisted through the storage module

pub mod engine;
pub mod navigation;
pub mod notifier;
pub mod persistence;
pub mod recent;
pub mod registry;
pub mod state;
pub mod types;

pub use engine::{CloseContext, TabEngine, TabUpdate};
pub use navigation::{home_location, resolve_tab_location, Location, Navigator};
pub use notifier::ChangeNotifier;
pub use persistence::WorkspaceStore;
pub use recent::RecentItems;
pub use registry::WorkspaceRegistry;
pub use state::TabsState;
pub use types::{create_tab_id, EditorFamily, Tab, TabMetadata, TabType, NEW_TAB_ID};
