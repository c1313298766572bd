// Read and upsert rows of the app_state key-value table

use rusqlite::params;
use super::database::{DatabaseManager, StorageResult};

impl DatabaseManager {
    /// Get a value from the app state store
    pub fn get_state(&self, key: &str) -> StorageResult<Option<String>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT value FROM app_state WHERE key = ?1")?;
            let result = stmt.query_row(params![key], |row| row.get(0));

            match result {
                Ok(value) => Ok(Some(value)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(e) => Err(e),
            }
        })
    }

    /// Set a value in the app state store
    pub fn set_state(&self, key: &str, value: &str) -> StorageResult<()> {
        self.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO app_state (key, value, updated_at)
                VALUES (?1, ?2, datetime('now'))
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = datetime('now')
                "#,
                params![key, value],
            )?;
            Ok(())
        })
    }
}
