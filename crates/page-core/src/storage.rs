//! Key-value storage for the few values that outlive a page view.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::{de::DeserializeOwned, Serialize};

use crate::{PageError, PageResult};

/// String key-value slot store (the shape of `window.localStorage`).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> PageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> PageResult<()>;
    fn remove(&self, key: &str) -> PageResult<()>;
}

/// Read and decode a JSON value.
pub fn load_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> PageResult<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value.
pub fn store_json<T: Serialize + ?Sized>(store: &dyn KeyValueStore, key: &str, value: &T) -> PageResult<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Process-local store, used natively and in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RefCell<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populate a slot.
    pub fn with(self, key: &str, value: &str) -> Self {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> PageResult<Option<String>> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> PageResult<()> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PageResult<()> {
        self.values.borrow_mut().remove(key);
        Ok(())
    }
}

/// `window.localStorage`.
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: web_sys::Storage,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    /// Open the window's local storage.
    pub fn open() -> PageResult<Self> {
        let window = web_sys::window().ok_or_else(|| PageError::Storage("no window".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| PageError::Storage(format!("{:?}", e)))?
            .ok_or_else(|| PageError::Storage("localStorage unavailable".into()))?;
        Ok(Self { storage })
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> PageResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| PageError::Storage(format!("{:?}", e)))
    }

    fn set(&self, key: &str, value: &str) -> PageResult<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| PageError::Storage(format!("{:?}", e)))
    }

    fn remove(&self, key: &str) -> PageResult<()> {
        self.storage
            .remove_item(key)
            .map_err(|e| PageError::Storage(format!("{:?}", e)))
    }
}

/// Store that rejects every operation, e.g. when storage is disabled.
#[derive(Debug, Default)]
pub struct UnavailableStore;

impl KeyValueStore for UnavailableStore {
    fn get(&self, _key: &str) -> PageResult<Option<String>> {
        Err(PageError::Storage("storage unavailable".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> PageResult<()> {
        Err(PageError::Storage("storage unavailable".into()))
    }

    fn remove(&self, _key: &str) -> PageResult<()> {
        Err(PageError::Storage("storage unavailable".into()))
    }
}
