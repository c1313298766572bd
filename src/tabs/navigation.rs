// Navigation targets for tabs
// The engine resolves a Location and hands it to the host's Navigator

use std::fmt;

use super::types::{EditorFamily, Tab, TabType};

/// Where focus moves when a tab is opened or closed
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    /// A saved query in the SQL editor
    SqlEditor {
        workspace_ref: String,
        sql_id: String,
        schema: String,
    },
    /// A table-like entity in the table editor
    TableEditor {
        workspace_ref: String,
        table_id: i64,
        schema: String,
    },
    SqlHome { workspace_ref: String },
    TableEditorHome { workspace_ref: String },
    /// Landing page of an editor panel, or of the workspace when none is known
    EditorHome {
        workspace_ref: String,
        editor: Option<EditorFamily>,
    },
}

impl Location {
    pub fn workspace_ref(&self) -> &str {
        match self {
            Location::SqlEditor { workspace_ref, .. }
            | Location::TableEditor { workspace_ref, .. }
            | Location::SqlHome { workspace_ref }
            | Location::TableEditorHome { workspace_ref }
            | Location::EditorHome { workspace_ref, .. } => workspace_ref,
        }
    }

    /// Route path for the location
    pub fn path(&self) -> String {
        match self {
            Location::SqlEditor {
                workspace_ref,
                sql_id,
                schema,
            } => format!("/project/{}/sql/{}?schema={}", workspace_ref, sql_id, schema),
            Location::TableEditor {
                workspace_ref,
                table_id,
                schema,
            } => format!("/project/{}/editor/{}?schema={}", workspace_ref, table_id, schema),
            Location::SqlHome { workspace_ref } => format!("/project/{}/sql", workspace_ref),
            Location::TableEditorHome { workspace_ref } => {
                format!("/project/{}/editor", workspace_ref)
            }
            Location::EditorHome {
                workspace_ref,
                editor: Some(editor),
            } => format!("/project/{}/{}", workspace_ref, editor),
            Location::EditorHome {
                workspace_ref,
                editor: None,
            } => format!("/project/{}", workspace_ref),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Host-side router the engine drives when focus moves
pub trait Navigator {
    /// Schema selected in the current route, if any
    fn current_schema(&self) -> Option<String> {
        None
    }

    /// Apply a navigation
    fn navigate(&mut self, location: Location);

    /// Forget the dashboard history of the current panel; called before
    /// falling back to a panel's home page
    fn clear_history(&mut self);
}

/// Resolve where opening `tab` should navigate to.
///
/// Query tabs use the route's schema (falling back to `default_schema`); table
/// tabs use the schema stored on the tab. Returns `None` when the tab lacks the
/// identifier its editor needs.
pub fn resolve_tab_location(
    workspace_ref: &str,
    tab: &Tab,
    current_schema: Option<&str>,
    default_schema: &str,
) -> Option<Location> {
    let metadata = tab.metadata.as_ref();
    match tab.tab_type.family() {
        EditorFamily::Sql => {
            let sql_id = metadata.and_then(|m| m.sql_id.clone())?;
            Some(Location::SqlEditor {
                workspace_ref: workspace_ref.to_string(),
                sql_id,
                schema: current_schema.unwrap_or(default_schema).to_string(),
            })
        }
        EditorFamily::Table => {
            let table_id = metadata.and_then(|m| m.table_id)?;
            let schema = metadata
                .and_then(|m| m.schema.clone())
                .unwrap_or_else(|| default_schema.to_string());
            Some(Location::TableEditor {
                workspace_ref: workspace_ref.to_string(),
                table_id,
                schema,
            })
        }
    }
}

/// Home page to land on after closing the last tab of a panel
pub fn home_location(
    workspace_ref: &str,
    closed_type: Option<TabType>,
    editor: Option<EditorFamily>,
) -> Location {
    let workspace_ref = workspace_ref.to_string();
    match closed_type.map(|t| t.family()) {
        Some(EditorFamily::Sql) => Location::SqlHome { workspace_ref },
        Some(EditorFamily::Table) => Location::TableEditorHome { workspace_ref },
        None => Location::EditorHome {
            workspace_ref,
            editor,
        },
    }
}
