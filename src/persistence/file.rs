//! Directory of JSON files, one per key

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::Store;
use crate::error::Result;

/// Stores each key as `<dir>/<key>.json`
///
/// Writes go to `<key>.json.tmp` first and are renamed over the live file,
/// so a crash mid-write leaves the previous value intact.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open (and create if needed) a store rooted at `dir`
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        log::info!("File store at {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Store for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        // Undecodable bytes surface as a serialization error, like bad JSON
        let bytes = fs::read(&path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn set(&mut self, key: &str, value: Value) -> Result<()> {
        let path = self.path_for(key);
        let tmp = self.dir.join(format!("{key}.json.tmp"));
        let json = serde_json::to_string_pretty(&value)?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &path)?;
        log::debug!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::load_or_else;
    use serde_json::json;

    #[test]
    fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut store = FileStore::open(dir.path()).unwrap();
            store.set("user", json!({ "name": "Player", "xp": 5 })).unwrap();
        }
        let store = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            store.get("user").unwrap(),
            Some(json!({ "name": "Player", "xp": 5 }))
        );
        assert_eq!(store.get("history").unwrap(), None);
        assert!(!dir.path().join("user.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("habits.json"), "{ not json").unwrap();

        assert!(store.get("habits").is_err());
        let loaded: Vec<u32> = load_or_else(&store, "habits", || vec![1, 2]).unwrap();
        assert_eq!(loaded, vec![1, 2]);
    }

    #[test]
    fn test_non_utf8_file_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        fs::write(dir.path().join("habits.json"), [0xff, 0xfe, 0x00]).unwrap();

        assert!(matches!(
            store.get("habits"),
            Err(crate::error::Error::Serialization(_))
        ));
        let loaded: Vec<u32> = load_or_else(&store, "habits", || vec![3]).unwrap();
        assert_eq!(loaded, vec![3]);
    }
}
