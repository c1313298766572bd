// Key-value medium abstraction
// The tab registry only needs get/set of opaque string values

use std::cell::RefCell;
use std::collections::BTreeMap;

use super::database::{DatabaseManager, StorageResult};

/// An opaque key-value medium that serialized workspace state is written to
pub trait KeyValueStore {
    /// Read the value stored under `key`
    fn get_value(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn set_value(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl KeyValueStore for DatabaseManager {
    fn get_value(&self, key: &str) -> StorageResult<Option<String>> {
        self.get_state(key)
    }

    fn set_value(&self, key: &str, value: &str) -> StorageResult<()> {
        self.set_state(key, value)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_value(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_value(key)
    }

    fn set_value(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_value(key, value)
    }
}

/// In-process store, useful for hosts without a database and for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.borrow().is_empty()
    }

    /// All stored keys in sorted order
    pub fn keys(&self) -> Vec<String> {
        self.values.borrow().keys().cloned().collect()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_value(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set_value(&self, key: &str, value: &str) -> StorageResult<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}
