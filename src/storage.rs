/// Persistence of folder state and settings in chrome.storage.local

use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use thiserror::Error;
use wasm_bindgen::prelude::*;

pub const FOLDER_STATE_KEY: &str = "folderState";
pub const APP_SETTINGS_KEY: &str = "appSettings";

// Import JS storage functions
#[wasm_bindgen(module = "/newtab.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn removeStorage(key: &str) -> Result<(), JsValue>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage backend failed: {0}")]
    Backend(String),
    #[error("could not encode {key}: {message}")]
    Encode { key: String, message: String },
    #[error("could not decode {key}: {message}")]
    Decode { key: String, message: String },
}

/// Key/value store holding JSON documents
#[allow(async_fn_in_trait)]
pub trait ConfigStore {
    async fn get_raw(&self, key: &str) -> Result<Option<Value>, StorageError>;

    async fn set_raw(&self, key: &str, value: Value) -> Result<(), StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read `key`, falling back to `default` when it is missing, unreadable or
/// of the wrong shape. Failures are logged, never returned.
pub async fn load_config<T, S>(store: &S, key: &str, default: T) -> T
where
    T: DeserializeOwned,
    S: ConfigStore,
{
    match store.get_raw(key).await {
        Ok(Some(value)) => match serde_json::from_value(value) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("stored {} is malformed, using defaults: {}", key, e);
                default
            }
        },
        Ok(None) => default,
        Err(e) => {
            log::error!("failed to load {}: {}", key, e);
            default
        }
    }
}

pub async fn save_config<T, S>(store: &S, key: &str, config: &T) -> Result<(), StorageError>
where
    T: Serialize,
    S: ConfigStore,
{
    let value = serde_json::to_value(config).map_err(|e| StorageError::Encode {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.set_raw(key, value).await
}

/// Save `config`, or clear `key` when it equals `default` so a later load
/// picks up whatever the defaults are then
pub async fn store_config<T, S>(store: &S, key: &str, config: &T, default: &T) -> Result<(), StorageError>
where
    T: Serialize + PartialEq,
    S: ConfigStore,
{
    if config == default {
        log::debug!("{} back to defaults, clearing it", key);
        store.remove(key).await
    } else {
        save_config(store, key, config).await
    }
}

/// In-process store for tests
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, Value>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(key: &str, value: Value) -> Self {
        let store = Self::new();
        store.values.borrow_mut().insert(key.to_string(), value);
        store
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.borrow().contains_key(key)
    }
}

impl ConfigStore for MemoryStore {
    async fn get_raw(&self, key: &str) -> Result<Option<Value>, StorageError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: Value) -> Result<(), StorageError> {
        self.values.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// chrome.storage.local through the page's JS bridge
#[derive(Debug, Clone, Copy, Default)]
pub struct ChromeStorage;

impl ConfigStore for ChromeStorage {
    async fn get_raw(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let stored = getStorage(key)
            .await
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))?;

        if stored.is_null() || stored.is_undefined() {
            return Ok(None);
        }

        serde_wasm_bindgen::from_value(stored)
            .map(Some)
            .map_err(|e| StorageError::Decode {
                key: key.to_string(),
                message: e.to_string(),
            })
    }

    async fn set_raw(&self, key: &str, value: Value) -> Result<(), StorageError> {
        // plain objects rather than JS Maps, so chrome.storage can hold them
        let js_value = value
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| StorageError::Encode {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        setStorage(key, js_value)
            .await
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        removeStorage(key)
            .await
            .map_err(|e| StorageError::Backend(format!("{:?}", e)))
    }
}
