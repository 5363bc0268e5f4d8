//! Browser `localStorage` as a preference store

use wasm_bindgen::JsValue;
use web_sys::Storage;

use schedview_core::{KeyValueStore, StoreError};

/// `window.localStorage`, when the page has one. Private browsing modes and
/// sandboxed frames may deny it; every call then fails with
/// [`StoreError::Unavailable`] and the view falls back to defaults.
#[derive(Clone, Debug)]
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|window| window.local_storage().ok().flatten());
        if storage.is_none() {
            web_sys::console::warn_1(&"schedview: localStorage unavailable".into());
        }
        Self { storage }
    }

    pub fn is_available(&self) -> bool {
        self.storage.is_some()
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage
            .as_ref()
            .ok_or_else(|| StoreError::Unavailable("localStorage is not available".into()))
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}

fn js_error(value: JsValue) -> StoreError {
    StoreError::Unavailable(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}
