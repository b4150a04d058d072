//! `window.localStorage` store

use super::KeyValueStore;
use crate::error::StorageError;
use wasm_bindgen::JsValue;
use web_sys::Storage;

/// Store backed by the page's `localStorage`; values are kept as raw strings
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStore;

impl BrowserStore {
    pub const fn new() -> Self {
        Self
    }
}

/// Get localStorage
fn get_local_storage() -> Result<Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

fn backend_error(err: JsValue) -> StorageError {
    StorageError::Backend(format!("{err:?}"))
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        get_local_storage()?.get_item(key).map_err(backend_error)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        get_local_storage()?
            .set_item(key, value)
            .map_err(backend_error)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        get_local_storage()?.remove_item(key).map_err(backend_error)
    }
}
