use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use crate::{DurableStore, StoreResult, validate_key};

/// Process-local store. Values vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn with_value(key: impl Into<String>, text: impl Into<String>) -> Self {
        let store = Self::default();
        store
            .slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), text.into());
        store
    }
}

impl DurableStore for MemoryStore {
    fn read(&self, key: &str) -> Option<String> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn write(&self, key: &str, text: &str) -> StoreResult<()> {
        validate_key(key)?;
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), text.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preloaded_value_is_readable_then_removable() {
        let store = MemoryStore::with_value("employees", "[]");
        assert_eq!(store.read("employees").as_deref(), Some("[]"));
        store.remove("employees");
        assert_eq!(store.read("employees"), None);
    }
}
