//! Client-local key/value storage for UI state.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mirrors browser `localStorage`: string keys, string values, values are
//! JSON text. The CLI persists to a JSON file next to the user; tests use
//! the in-memory store. Nothing here is ever sent to the backend.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::warn;

/// Key under which the container-type display order is stored.
pub const CONTAINER_ORDER_KEY: &str = "good-neighbor.container-order";

#[derive(Debug, thiserror::Error)]
pub enum UiStoreError {
    #[error("ui store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ui store json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub trait UiStore: Send + Sync {
    /// Raw value for `key`, if present.
    fn get_item(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns an error if the value cannot be persisted.
    fn set_item(&self, key: &str, value: &str) -> Result<(), UiStoreError>;
}

/// Load a JSON value for `key`. Missing or unparseable values read as `None`.
pub fn load_json<T: DeserializeOwned>(store: &impl UiStore, key: &str) -> Option<T> {
    let raw = store.get_item(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(%key, error = %e, "ignoring unparseable ui value");
            None
        }
    }
}

/// Save a JSON value for `key`. Failures are logged, not returned: losing a
/// UI preference must not break the caller.
pub fn save_json<T: Serialize + ?Sized>(store: &impl UiStore, key: &str, value: &T) {
    let raw = match serde_json::to_string(value) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(%key, error = %e, "failed to encode ui value");
            return;
        }
    };
    if let Err(e) = store.set_item(key, &raw) {
        warn!(%key, error = %e, "failed to save ui value");
    }
}

// =============================================================================
// IN-MEMORY
// =============================================================================

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl UiStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), UiStoreError> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// Whole store kept in one JSON object file, rewritten on every set.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, UiStoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }
}

impl UiStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        match self.read_all() {
            Ok(mut items) => items.remove(key),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "unreadable ui state file");
                None
            }
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), UiStoreError> {
        // A corrupt file is replaced rather than blocking every later write.
        let mut items = self.read_all().unwrap_or_default();
        items.insert(key.to_owned(), value.to_owned());
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&items)?)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "ui_store_test.rs"]
mod tests;
