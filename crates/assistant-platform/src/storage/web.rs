//! `window.localStorage` backend.
//! Persistent across page reloads, scoped to the origin. Values are stored
//! as UTF-8 strings, which is what every blob we write (JSON) already is.

use async_trait::async_trait;
use wasm_bindgen::JsValue;
use web_sys::Storage;

use assistant_core::ports::StoragePort;
use assistant_types::{AppError, Result};

const PROBE_KEY: &str = "assistant:probe";

pub struct WebStorage {
    storage: Storage,
}

impl WebStorage {
    /// Open localStorage and check that it accepts writes. Private browsing
    /// modes can expose a Storage object that throws on every `setItem`.
    pub fn open() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| AppError::Storage("No window object".to_string()))?;

        let storage = window
            .local_storage()
            .map_err(js_err)?
            .ok_or_else(|| AppError::Storage("localStorage not available".to_string()))?;

        storage.set_item(PROBE_KEY, "1").map_err(js_err)?;
        storage.remove_item(PROBE_KEY).map_err(js_err)?;

        Ok(Self { storage })
    }
}

#[async_trait(?Send)]
impl StoragePort for WebStorage {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let value = self.storage.get_item(key).map_err(js_err)?;
        Ok(value.map(String::into_bytes))
    }

    async fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let text = std::str::from_utf8(value)
            .map_err(|e| AppError::Storage(format!("value for {} is not UTF-8: {}", key, e)))?;
        self.storage.set_item(key, text).map_err(js_err)
    }

    fn backend_name(&self) -> &str {
        "localStorage"
    }
}

fn js_err(e: JsValue) -> AppError {
    AppError::Storage(format!("{:?}", e))
}
