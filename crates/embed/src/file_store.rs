//! File-backed [`KeyValueStore`] for hosts without browser storage.
//!
//! Entries live in a single JSON object and every read goes to disk. Writes
//! are serialized per path within the process, so any number of `FileStore`
//! instances on one file are safe; separate processes sharing a file are not
//! coordinated. Each write lands in a fresh sibling temp file that is then
//! persisted over the target.

use std::collections::{BTreeMap, HashMap};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use cta_core::dismissal::{KeyValueStore, StorageError};
use tempfile::NamedTempFile;

/// One write lock per store path, shared by every instance in the process.
fn path_lock(path: &Path) -> Arc<Mutex<()>> {
    static LOCKS: OnceLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> = OnceLock::new();

    let key = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut locks = LOCKS
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(locks.entry(key).or_default())
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let write_lock = path_lock(&path);
        Self { path, write_lock }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&raw).map_err(|e| {
            StorageError::Corrupt(format!("{}: {e}", self.path.display()))
        })
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StorageError::Io(e.error))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::Unavailable("file store lock poisoned".into()))?;
        let mut entries = match self.read_entries() {
            Ok(entries) => entries,
            Err(StorageError::Corrupt(reason)) => {
                tracing::warn!(
                    path = %self.path.display(),
                    %reason,
                    "Dismissal file is corrupt, starting a fresh one"
                );
                BTreeMap::new()
            }
            Err(e) => return Err(e),
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_entries(&entries)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use assert_matches::assert_matches;
    use cta_core::dismissal::DismissalStore;

    use super::*;

    #[test]
    fn missing_file_reads_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("dismissals.json"));
        assert_eq!(store.get("banner-dismissed-1").unwrap(), None);
    }

    #[test]
    fn dismissal_survives_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dismissals.json");

        DismissalStore::new(Arc::new(FileStore::new(&path))).set("banner-dismissed-3");

        let reopened = DismissalStore::new(Arc::new(FileStore::new(&path)));
        assert!(reopened.has("banner-dismissed-3"));
        assert!(!reopened.has("banner-dismissed-4"));
    }

    #[test]
    fn writes_keep_existing_entries() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("dismissals.json"));
        store.set("a", "1").unwrap();
        store.set("b", "1").unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("b").unwrap().as_deref(), Some("1"));

        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(leftovers, vec![std::ffi::OsString::from("dismissals.json")]);
    }

    #[test]
    fn concurrent_instances_keep_every_write() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dismissals.json");

        let writers: Vec<_> = (0..8)
            .map(|t| {
                let path = path.clone();
                std::thread::spawn(move || {
                    let store = FileStore::new(&path);
                    for i in 0..25 {
                        store.set(&format!("banner-dismissed-{t}-{i}"), "1").unwrap();
                    }
                })
            })
            .collect();
        for writer in writers {
            writer.join().unwrap();
        }

        let store = FileStore::new(&path);
        for t in 0..8 {
            for i in 0..25 {
                let key = format!("banner-dismissed-{t}-{i}");
                assert_eq!(store.get(&key).unwrap().as_deref(), Some("1"), "{key}");
            }
        }
    }

    #[test]
    fn garbage_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dismissals.json");
        std::fs::write(&path, "not json").unwrap();
        assert_matches!(FileStore::new(&path).get("a"), Err(StorageError::Corrupt(_)));
    }

    #[test]
    fn write_replaces_a_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dismissals.json");
        std::fs::write(&path, "not json").unwrap();
        let store = DismissalStore::new(Arc::new(FileStore::new(&path)));

        assert!(!store.has("banner-dismissed-6"));
        store.set("banner-dismissed-6");
        assert!(store.has("banner-dismissed-6"));
    }

    #[test]
    fn unwritable_path_never_panics() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        // A regular file cannot hold children.
        let store = DismissalStore::new(Arc::new(FileStore::new(blocker.join("dismissals.json"))));

        store.set("banner-dismissed-5");
        assert!(!store.has("banner-dismissed-5"));
    }
}
