//! Browser LocalStorage backend

use serde_json::Value;

use super::Store;
use crate::error::{Error, Result};

/// LocalStorage with every key namespaced by a prefix
pub struct LocalStorageStore {
    storage: web_sys::Storage,
    prefix: String,
}

impl LocalStorageStore {
    /// Default namespace for game keys
    pub const DEFAULT_PREFIX: &'static str = "questlog-";

    /// Attach to the window's LocalStorage
    pub fn open(prefix: impl Into<String>) -> Result<Self> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| Error::Storage {
                key: String::new(),
                message: "LocalStorage unavailable".to_string(),
            })?;
        Ok(Self {
            storage,
            prefix: prefix.into(),
        })
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl Store for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let item = self
            .storage
            .get_item(&self.full_key(key))
            .map_err(|e| Error::Storage {
                key: key.to_string(),
                message: format!("{:?}", e),
            })?;
        match item {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let json = serde_json::to_string(&value)?;
        self.storage
            .set_item(&self.full_key(key), &json)
            .map_err(|e| Error::Storage {
                key: key.to_string(),
                message: format!("{:?}", e),
            })
    }
}
