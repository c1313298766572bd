// Tab data model
// Tabs are open table-like entity editors or SQL query editors within a workspace

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder identity for an unsaved query that has not been given an id yet.
/// Closing it always moves focus, whether or not it is the active tab.
pub const NEW_TAB_ID: &str = "new";

/// Tab type enum, one variant per kind of entity view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TabType {
    #[serde(rename = "r")]
    Table,
    #[serde(rename = "v")]
    View,
    #[serde(rename = "m")]
    MaterializedView,
    #[serde(rename = "f")]
    ForeignTable,
    #[serde(rename = "p")]
    PartitionedTable,
    #[serde(rename = "sql")]
    Sql,
}

impl TabType {
    pub const ALL: [TabType; 6] = [
        TabType::Table,
        TabType::View,
        TabType::MaterializedView,
        TabType::ForeignTable,
        TabType::PartitionedTable,
        TabType::Sql,
    ];

    /// Short code used in tab ids and in the persisted layout
    pub fn as_str(&self) -> &'static str {
        match self {
            TabType::Table => "r",
            TabType::View => "v",
            TabType::MaterializedView => "m",
            TabType::ForeignTable => "f",
            TabType::PartitionedTable => "p",
            TabType::Sql => "sql",
        }
    }

    pub fn from_code(s: &str) -> Option<Self> {
        match s {
            "r" => Some(TabType::Table),
            "v" => Some(TabType::View),
            "m" => Some(TabType::MaterializedView),
            "f" => Some(TabType::ForeignTable),
            "p" => Some(TabType::PartitionedTable),
            "sql" => Some(TabType::Sql),
            _ => None,
        }
    }

    /// Recover the type from a tab id built by [`create_tab_id`]
    pub fn from_tab_id(id: &str) -> Option<Self> {
        let (code, _) = id.split_once('-')?;
        Self::from_code(code)
    }

    /// Which editor panel hosts tabs of this type
    pub fn family(&self) -> EditorFamily {
        match self {
            TabType::Sql => EditorFamily::Sql,
            TabType::Table
            | TabType::View
            | TabType::MaterializedView
            | TabType::ForeignTable
            | TabType::PartitionedTable => EditorFamily::Table,
        }
    }

    /// Canonical id for the entity `discriminant` of this type
    pub fn tab_id(&self, discriminant: impl fmt::Display) -> String {
        format!("{}-{}", self.as_str(), discriminant)
    }
}

impl fmt::Display for TabType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Grouping of tab types by the editor panel they open in
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum EditorFamily {
    Table,
    Sql,
}

impl EditorFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorFamily::Table => "table",
            EditorFamily::Sql => "sql",
        }
    }

    /// All tab types that belong to this family
    pub fn tab_types(&self) -> impl Iterator<Item = TabType> + '_ {
        TabType::ALL.into_iter().filter(move |t| t.family() == *self)
    }

    pub fn contains(&self, tab_type: TabType) -> bool {
        tab_type.family() == *self
    }
}

impl fmt::Display for EditorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build the canonical tab id for a type code and its discriminant.
///
/// Returns `None` when `type_code` is not a tab type (for example `schema` or
/// `new`); callers must treat that as a failure rather than an id.
pub fn create_tab_id(type_code: &str, discriminant: impl fmt::Display) -> Option<String> {
    TabType::from_code(type_code).map(|t| t.tab_id(discriminant))
}

/// Extra data a tab needs to find its way back to the entity it shows
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_id: Option<String>,
    /// Editor scroll position, currently only kept for SQL tabs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroll_top: Option<f64>,
}

/// A single open view within a workspace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    pub id: String,
    #[serde(rename = "type")]
    pub tab_type: TabType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<TabMetadata>,
    /// `Some(false)` marks an explicitly permanent tab; `None` opens as a preview
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_preview: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Tab {
    /// Create a tab with the given id, stamped with the current time
    pub fn new(id: impl Into<String>, tab_type: TabType) -> Self {
        let now = Utc::now();
        Self {
            id: id.into(),
            tab_type,
            label: None,
            metadata: None,
            is_preview: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Tab for a table-like entity in `schema`
    pub fn entity(tab_type: TabType, table_id: i64, schema: impl Into<String>) -> Self {
        Self::new(tab_type.tab_id(table_id), tab_type).with_metadata(TabMetadata {
            schema: Some(schema.into()),
            table_id: Some(table_id),
            ..Default::default()
        })
    }

    /// Tab for a saved SQL query
    pub fn query(sql_id: impl Into<String>) -> Self {
        let sql_id = sql_id.into();
        Self::new(TabType::Sql.tab_id(&sql_id), TabType::Sql).with_metadata(TabMetadata {
            sql_id: Some(sql_id),
            ..Default::default()
        })
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_metadata(mut self, metadata: TabMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Mark the tab as explicitly permanent
    pub fn permanent(mut self) -> Self {
        self.is_preview = Some(false);
        self
    }

    pub fn is_preview(&self) -> bool {
        self.is_preview.unwrap_or(false)
    }

    pub fn family(&self) -> EditorFamily {
        self.tab_type.family()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tab_id_is_deterministic() {
        assert_eq!(create_tab_id("r", 42), Some("r-42".to_string()));
        assert_eq!(create_tab_id("r", 42), create_tab_id("r", 42));
        assert_eq!(create_tab_id("sql", "abc-123"), Some("sql-abc-123".to_string()));
        assert_eq!(create_tab_id("p", 7), Some(TabType::PartitionedTable.tab_id(7)));
    }

    #[test]
    fn test_create_tab_id_rejects_unknown_types() {
        assert_eq!(create_tab_id("schema", "public"), None);
        assert_eq!(create_tab_id("new", ""), None);
        assert_eq!(create_tab_id("", 1), None);
    }

    #[test]
    fn test_tab_type_codes_roundtrip() {
        for tab_type in TabType::ALL {
            assert_eq!(TabType::from_code(tab_type.as_str()), Some(tab_type));
            assert_eq!(TabType::from_tab_id(&tab_type.tab_id(5)), Some(tab_type));
        }
        assert_eq!(TabType::from_tab_id("sql-with-dashes"), Some(TabType::Sql));
        assert_eq!(TabType::from_tab_id("new"), None);
    }

    #[test]
    fn test_families() {
        let table: Vec<_> = EditorFamily::Table.tab_types().collect();
        assert_eq!(table.len(), 5);
        assert!(!table.contains(&TabType::Sql));
        assert_eq!(EditorFamily::Sql.tab_types().collect::<Vec<_>>(), vec![TabType::Sql]);
        assert!(EditorFamily::Table.contains(TabType::MaterializedView));
    }

    #[test]
    fn test_tab_serializes_camel_case_with_type_code() {
        let tab = Tab {
            id: "r-1".to_string(),
            tab_type: TabType::Table,
            label: Some("users".to_string()),
            metadata: Some(TabMetadata {
                schema: Some("public".to_string()),
                table_id: Some(1),
                ..Default::default()
            }),
            is_preview: Some(true),
            created_at: None,
            updated_at: None,
        };

        let json = serde_json::to_value(&tab).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "r-1",
                "type": "r",
                "label": "users",
                "metadata": { "schema": "public", "tableId": 1 },
                "isPreview": true
            })
        );
    }

    #[test]
    fn test_constructors() {
        let tab = Tab::entity(TabType::View, 9, "auth").with_label("sessions");
        assert_eq!(tab.id, "v-9");
        assert_eq!(tab.family(), EditorFamily::Table);
        assert_eq!(tab.metadata.as_ref().and_then(|m| m.schema.as_deref()), Some("auth"));
        assert!(!tab.is_preview());
        assert!(tab.created_at.is_some());

        let query = Tab::query("q1").permanent();
        assert_eq!(query.id, "sql-q1");
        assert_eq!(query.is_preview, Some(false));
    }
}
