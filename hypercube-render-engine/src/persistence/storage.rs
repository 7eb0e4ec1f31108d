use crate::error::StorageError;
use bevy::prelude::*;
use std::collections::HashMap;

#[cfg(target_arch = "wasm32")]
use web_sys::window;

pub trait KeyValueStorage: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Process-local storage for native builds and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl KeyValueStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// `window.localStorage`, looked up on every call so no JS handle is held.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
impl BrowserStorage {
    fn local_storage() -> Result<web_sys::Storage, StorageError> {
        window()
            .ok_or_else(|| StorageError::Unavailable("no window".into()))?
            .local_storage()
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))?
            .ok_or_else(|| StorageError::Unavailable("localStorage disabled".into()))
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStorage for BrowserStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Self::local_storage()?
            .get_item(key)
            .map_err(|e| StorageError::Unavailable(format!("{:?}", e)))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        Self::local_storage()?
            .set_item(key, value)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        Self::local_storage()?
            .remove_item(key)
            .map_err(|e| StorageError::Write(format!("{:?}", e)))
    }
}

#[derive(Resource)]
pub struct StateStorage(pub Box<dyn KeyValueStorage>);

impl Default for StateStorage {
    fn default() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            Self(Box::new(BrowserStorage))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            Self(Box::new(MemoryStorage::default()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_storage_overwrites_and_removes() {
        let mut storage = MemoryStorage::default();
        assert_eq!(storage.read("k"), Ok(None));
        storage.write("k", "1").unwrap();
        storage.write("k", "2").unwrap();
        assert_eq!(storage.read("k"), Ok(Some("2".to_string())));
        storage.remove("k").unwrap();
        assert_eq!(storage.read("k"), Ok(None));
    }
}
