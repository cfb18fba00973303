//! Durable key-value storage
//!
//! The game keeps a handful of small JSON documents (leaderboard, unlock
//! flags, settings) under fixed keys. Backends:
//! - [`MemoryStorage`]: in-process map, used by tests and throwaway sessions
//! - [`FileStorage`]: one file per key in a data directory (native)
//! - `LocalStorage`: browser LocalStorage (wasm32)
//!
//! Reads are forgiving: a missing or unparseable document is logged and
//! replaced by its default. Writes report failures to the caller.

#[cfg(not(target_arch = "wasm32"))]
pub mod file;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStorage;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorage;

use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Backend cannot be reached (e.g. LocalStorage disabled)
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Key-value persistence collaborator
pub trait Storage {
    /// Read the raw document stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous document
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`; deleting a missing key is not an error
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Load a JSON document, falling back to `T::default()` when it is absent,
/// unreadable, or corrupt.
pub fn load_json<T, S>(storage: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: Storage + ?Sized,
{
    match storage.get(key) {
        Ok(Some(json)) => match serde_json::from_str(&json) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Discarding corrupt '{}': {}", key, e);
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            log::warn!("Could not read '{}': {}", key, e);
            T::default()
        }
    }
}

/// Serialize `value` as JSON under `key`
pub fn save_json<T, S>(storage: &mut S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: Storage + ?Sized,
{
    let json = serde_json::to_string(value)?;
    storage.set(key, &json)
}

/// In-memory storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("k").unwrap(), None);

        storage.set("k", "v").unwrap();
        assert_eq!(storage.get("k").unwrap().as_deref(), Some("v"));

        storage.remove("k").unwrap();
        assert!(storage.is_empty());
        // Removing twice is fine
        storage.remove("k").unwrap();
    }

    #[test]
    fn test_load_json_recovers_from_corruption() {
        let mut storage = MemoryStorage::new();
        storage.set("numbers", "[1, 2,").unwrap();
        let numbers: Vec<u32> = load_json(&storage, "numbers");
        assert!(numbers.is_empty());
    }

    #[test]
    fn test_save_then_load_json() {
        let mut storage = MemoryStorage::new();
        save_json(&mut storage, "numbers", &vec![3u32, 1, 2]).unwrap();
        let numbers: Vec<u32> = load_json(&storage, "numbers");
        assert_eq!(numbers, vec![3, 1, 2]);
    }
}
