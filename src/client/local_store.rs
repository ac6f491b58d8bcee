use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};

use super::error::ClientError;

/// Small persistent string map, the native stand-in for browser local storage.
/// Every write is flushed to the backing JSON file right away.
#[derive(Debug, Default)]
pub struct LocalStore {
    path: Option<PathBuf>,
    entries: BTreeMap<String, String>,
}

impl LocalStore {
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Load the store from `path`. A missing file starts empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|e| ClientError::Storage(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(ClientError::Storage(e.to_string())),
        };
        Ok(Self {
            path: Some(path),
            entries,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Read a JSON value. Entries that no longer parse are treated as absent.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|raw| serde_json::from_str(raw).ok())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Result<(), ClientError> {
        self.entries.insert(key.into(), value.into());
        self.flush()
    }

    pub fn set_json<T: Serialize>(&mut self, key: impl Into<String>, value: &T) -> Result<(), ClientError> {
        let raw = serde_json::to_string(value).map_err(|e| ClientError::Storage(e.to_string()))?;
        self.set(key, raw)
    }

    pub fn remove(&mut self, key: &str) -> Result<(), ClientError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), ClientError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let raw = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| ClientError::Storage(e.to_string()))?;
        fs::write(path, raw).map_err(|e| ClientError::Storage(format!("{}: {e}", path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");

        let mut store = LocalStore::open(&path).unwrap();
        assert_eq!(store.get("client_id"), None);
        store.set("client_id", "abc").unwrap();
        store.set_json("count", &3u32).unwrap();

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.get("client_id"), Some("abc"));
        assert_eq!(reopened.get_json::<u32>("count"), Some(3));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(LocalStore::open(&path), Err(ClientError::Storage(_))));
    }

    #[test]
    fn remove_deletes_key() {
        let mut store = LocalStore::in_memory();
        store.set("k", "v").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k"), None);
    }
}
