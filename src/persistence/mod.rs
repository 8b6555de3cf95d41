//! Key-value persistence
//!
//! Every piece of game state lives under its own logical key as a plain JSON
//! value. Backends:
//! - `MemoryStore`: in-process map (tests, embedding)
//! - `FileStore`: one JSON file per key, written tmp → rename
//! - `LocalStorageStore`: browser LocalStorage (wasm32 only)

mod file;
#[cfg(target_arch = "wasm32")]
mod local_storage;
mod memory;

pub use file::FileStore;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Error, Result};

/// Logical store keys
pub mod keys {
    pub const USER: &str = "user";
    pub const HISTORY: &str = "history";
    pub const ONBOARDING: &str = "onboarding";
    pub const HABITS: &str = "habits";
    pub const LAST_RESET: &str = "lastReset";
    pub const DAILIES: &str = "dailies";
    pub const SETTINGS: &str = "settings";
}

/// Synchronous durable key-value store
pub trait Store {
    /// Read a key, `None` if it was never written
    fn get(&self, key: &str) -> Result<Option<Value>>;
    /// Overwrite a key
    fn set(&mut self, key: &str, value: Value) -> Result<()>;
}

impl<S: Store + ?Sized> Store for &mut S {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value)
    }
}

impl<S: Store + ?Sized> Store for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Outcome of [`load_or_seed`]
#[derive(Debug, Clone, PartialEq)]
pub struct Loaded<T> {
    pub value: T,
    /// True when the stored value was absent or unreadable and `value` is
    /// the default. The caller should write it back.
    pub seeded: bool,
}

/// Load a typed value, falling back to `default` when absent or unreadable
///
/// Corrupt or schema-mismatched data is logged and replaced by the default;
/// backend failures are returned.
pub fn load_or_seed<T, S, F>(store: &S, key: &str, default: F) -> Result<Loaded<T>>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
    F: FnOnce() -> T,
{
    let seed = |default: F| Loaded {
        value: default(),
        seeded: true,
    };

    let value = match store.get(key) {
        Ok(Some(value)) => value,
        Ok(None) => {
            log::info!("No stored '{}', using defaults", key);
            return Ok(seed(default));
        }
        Err(Error::Serialization(e)) => {
            log::warn!("Stored '{}' is not valid JSON ({}), using defaults", key, e);
            return Ok(seed(default));
        }
        Err(e) => return Err(e),
    };

    match serde_json::from_value(value) {
        Ok(loaded) => {
            log::debug!("Loaded '{}'", key);
            Ok(Loaded {
                value: loaded,
                seeded: false,
            })
        }
        Err(e) => {
            log::warn!("Stored '{}' does not match schema ({}), using defaults", key, e);
            Ok(seed(default))
        }
    }
}

/// [`load_or_seed`] without the seeded flag
pub fn load_or_else<T, S, F>(store: &S, key: &str, default: F) -> Result<T>
where
    T: DeserializeOwned,
    S: Store + ?Sized,
    F: FnOnce() -> T,
{
    load_or_seed(store, key, default).map(|loaded| loaded.value)
}

/// Serialize and write a typed value
pub fn save<T, S>(store: &mut S, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
    S: Store + ?Sized,
{
    let json = serde_json::to_value(value)?;
    store.set(key, json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Counter {
        count: u32,
    }

    #[test]
    fn test_load_missing_uses_default() {
        let store = MemoryStore::new();
        let loaded: Counter = load_or_else(&store, "counter", || Counter { count: 7 }).unwrap();
        assert_eq!(loaded, Counter { count: 7 });
    }

    #[test]
    fn test_save_then_load() {
        let mut store = MemoryStore::new();
        save(&mut store, "counter", &Counter { count: 3 }).unwrap();
        let loaded: Counter = load_or_else(&store, "counter", || Counter { count: 0 }).unwrap();
        assert_eq!(loaded, Counter { count: 3 });
    }

    #[test]
    fn test_seeded_flag() {
        let mut store = MemoryStore::new();
        let loaded = load_or_seed(&store, "counter", || Counter { count: 0 }).unwrap();
        assert!(loaded.seeded);

        save(&mut store, "counter", &Counter { count: 4 }).unwrap();
        let loaded = load_or_seed(&store, "counter", || Counter { count: 0 }).unwrap();
        assert_eq!(loaded, Loaded { value: Counter { count: 4 }, seeded: false });

        store.set("counter", serde_json::json!("garbage")).unwrap();
        let loaded = load_or_seed(&store, "counter", || Counter { count: 0 }).unwrap();
        assert!(loaded.seeded);
    }

    #[test]
    fn test_schema_mismatch_uses_default() {
        let mut store = MemoryStore::new();
        store
            .set("counter", serde_json::json!({ "count": "many" }))
            .unwrap();
        let loaded: Counter = load_or_else(&store, "counter", || Counter { count: 1 }).unwrap();
        assert_eq!(loaded, Counter { count: 1 });
    }
}
