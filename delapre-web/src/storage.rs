//! `localStorage` behind the core `KeyValueStore` seam.
use crate::dom::{js_error_message, local_storage};
use delapre_core::KeyValueStore;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserStorageError {
    #[error("localStorage unavailable: {0}")]
    Unavailable(String),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Raw string access to `localStorage`. Values are stored exactly as given.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl BrowserStorage {
    fn handle() -> Result<web_sys::Storage, BrowserStorageError> {
        local_storage().map_err(|err| BrowserStorageError::Unavailable(js_error_message(&err)))
    }
}

impl KeyValueStore for BrowserStorage {
    type Error = BrowserStorageError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Self::handle()?
            .get_item(key)
            .map_err(|err| BrowserStorageError::Storage(js_error_message(&err)))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        Self::handle()?
            .set_item(key, value)
            .map_err(|err| BrowserStorageError::Storage(js_error_message(&err)))
    }

    fn remove(&self, key: &str) -> Result<(), Self::Error> {
        Self::handle()?
            .remove_item(key)
            .map_err(|err| BrowserStorageError::Storage(js_error_message(&err)))
    }
}
