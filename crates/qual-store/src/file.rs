//! File-backed store
//!
//! One pretty-printed JSON file per key under a root directory. Keys are
//! sanitized into file names, so keys should stay within
//! `[A-Za-z0-9._-]` to round-trip through `keys()` unchanged.

use crate::error::StoreError;
use crate::kv::KeyValueStore;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Directory-of-JSON-files key-value store
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `root`, creating the directory if needed
    ///
    /// # Errors
    /// Returns `StoreError::Io` when the directory cannot be created.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let sanitized: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{sanitized}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path)?;
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(&value)?;
        fs::write(self.path_for(key), bytes)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn roundtrips_through_the_filesystem() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();

        store.set("analysis_01", json!({"status": "queued"})).unwrap();
        assert_eq!(
            store.get("analysis_01").unwrap(),
            Some(json!({"status": "queued"}))
        );
    }

    #[test]
    fn values_survive_reopening() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStore::open(dir.path()).unwrap();
            store.set("analysis_02", json!({"progress": 40})).unwrap();
        }
        let reopened = FileStore::open(dir.path()).unwrap();
        assert_eq!(
            reopened.get("analysis_02").unwrap(),
            Some(json!({"progress": 40}))
        );
    }

    #[test]
    fn keys_lists_stored_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("analysis_a", json!(1)).unwrap();
        store.set("analysis_b", json!(2)).unwrap();

        let mut keys = store.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["analysis_a", "analysis_b"]);
    }

    #[test]
    fn remove_then_get_reads_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        store.set("analysis_c", json!(3)).unwrap();
        store.remove("analysis_c").unwrap();
        assert_eq!(store.get("analysis_c").unwrap(), None);
        store.remove("analysis_c").unwrap();
    }
}
