//! `window.localStorage` as [`DurableStorage`].

use wasm_bindgen::{JsCast, JsValue};

use consolekit_core::{DurableStorage, StorageError, StorageResult};

/// Handle to the page's `localStorage`. Resolved on every call so a store
/// that becomes unavailable mid-session degrades instead of panicking.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn handle() -> StorageResult<web_sys::Storage> {
        let window = web_sys::window().ok_or_else(|| StorageError::unavailable("no window"))?;
        window
            .local_storage()
            .map_err(js_storage_error)?
            .ok_or_else(|| StorageError::unavailable("localStorage disabled"))
    }
}

impl DurableStorage for LocalStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Self::handle()?.get_item(key).map_err(js_storage_error)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        Self::handle()?.set_item(key, value).map_err(js_storage_error)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        Self::handle()?.remove_item(key).map_err(js_storage_error)
    }
}

fn js_storage_error(err: JsValue) -> StorageError {
    match err.dyn_ref::<web_sys::DomException>() {
        Some(exception) => StorageError::from_dom_exception(&exception.name(), exception.message()),
        None => StorageError::unavailable(format!("{err:?}")),
    }
}
