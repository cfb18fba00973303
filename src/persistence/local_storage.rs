//! Browser LocalStorage backend (wasm32 only)

use super::{Storage, StorageError};

/// Keys are prefixed so the game shares the origin's storage politely
const KEY_PREFIX: &str = "river_run_";

#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }

    fn storage(&self) -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("LocalStorage not accessible".into()))
    }
}

fn js_error(err: wasm_bindgen::JsValue) -> StorageError {
    StorageError::Unavailable(format!("{:?}", err))
}

impl Storage for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?
            .get_item(&format!("{KEY_PREFIX}{key}"))
            .map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?
            .set_item(&format!("{KEY_PREFIX}{key}"), value)
            .map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage()?
            .remove_item(&format!("{KEY_PREFIX}{key}"))
            .map_err(js_error)
    }
}
