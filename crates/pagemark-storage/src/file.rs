//! JSON file storage backend.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;

use crate::adapter::{ChangeCallback, Storage, SubscriptionId};
use crate::error::{Result, StorageError};
use crate::io::{file_hash, read_json_file, write_json_atomic};
use crate::keys::validate_key;
use crate::subscribers::Subscribers;

/// Only one owner exists per `FileStorage`; other writers are other processes
/// (or other `FileStorage` values over the same directory).
const OWNER: u64 = 0;

#[derive(Default)]
struct FileState {
    subscribers: Subscribers,
    /// Last content hash this handle wrote or observed, per key.
    /// `None` records that the file was absent.
    known: HashMap<String, Option<String>>,
}

/// Storage backed by one `<key>.json` file per key.
pub struct FileStorage {
    dir: PathBuf,
    state: Mutex<FileState>,
}

impl fmt::Debug for FileStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileStorage")
            .field("dir", &self.dir)
            .finish_non_exhaustive()
    }
}

impl FileStorage {
    /// Use `dir` as the data directory. It is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            state: Mutex::new(FileState::default()),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }

    /// Re-check every subscribed key on disk and notify subscribers of
    /// content written by someone else since this handle last looked.
    ///
    /// Returns the number of keys that changed.
    pub fn poll_external_changes(&self) -> Result<usize> {
        let keys = self.lock()?.subscribers.keys();
        let mut changed = 0;

        for key in keys {
            let path = self.path_for(&key)?;
            let current = file_hash(&path)?;
            let known = self.lock()?.known.get(&key).cloned().flatten();
            if current == known {
                continue;
            }

            let Some((value, hash)) = read_json_file(&path, &key)? else {
                // Removed behind our back; there is no value to hand out.
                self.lock()?.known.insert(key, None);
                continue;
            };

            let callbacks = {
                let mut state = self.lock()?;
                state.known.insert(key.clone(), Some(hash));
                state.subscribers.interested(&key, None)
            };
            tracing::info!(key = %key, "detected external change");
            for callback in callbacks {
                callback(&key, &value);
            }
            changed += 1;
        }

        Ok(changed)
    }

    fn lock(&self) -> Result<MutexGuard<'_, FileState>> {
        self.state.lock().map_err(|_| StorageError::Unavailable {
            reason: "storage lock poisoned".to_string(),
        })
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;
        let loaded = read_json_file(&path, key)?;
        let mut state = self.lock()?;
        match loaded {
            Some((value, hash)) => {
                state.known.insert(key.to_string(), Some(hash));
                Ok(Some(value))
            }
            None => {
                state.known.insert(key.to_string(), None);
                Ok(None)
            }
        }
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        let path = self.path_for(key)?;
        let hash = write_json_atomic(&path, key, value)?;
        self.lock()?.known.insert(key.to_string(), Some(hash));
        Ok(())
    }

    fn subscribe(&self, key: &str, callback: ChangeCallback) -> Result<SubscriptionId> {
        let path = self.path_for(key)?;
        let baseline = file_hash(&path)?;
        let mut state = self.lock()?;
        state.known.entry(key.to_string()).or_insert(baseline);
        Ok(state.subscribers.add(OWNER, key, callback))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Ok(mut state) = self.lock() {
            state.subscribers.remove(id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    fn recorder() -> (ChangeCallback, Arc<Mutex<Vec<Value>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ChangeCallback = Arc::new(move |_key: &str, value: &Value| {
            sink.lock().unwrap().push(value.clone());
        });
        (callback, seen)
    }

    #[test]
    fn set_then_get_round_trips() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("data"));
        let value = json!({"b1": [{"id": "e1", "isEnabled": true}]});

        assert_eq!(storage.get("book-progresses").unwrap(), None);
        storage.set("book-progresses", &value).unwrap();

        assert_eq!(storage.get("book-progresses").unwrap(), Some(value));
        assert!(dir.path().join("data/book-progresses.json").exists());
    }

    #[test]
    fn poll_reports_writes_from_another_handle() {
        let dir = tempdir().unwrap();
        let writer = FileStorage::new(dir.path());
        let reader = FileStorage::new(dir.path());
        let (callback, seen) = recorder();
        reader.subscribe("books", callback).unwrap();

        writer.set("books", &json!(["Foo"])).unwrap();

        assert_eq!(reader.poll_external_changes().unwrap(), 1);
        assert_eq!(*seen.lock().unwrap(), vec![json!(["Foo"])]);
        // Nothing new on the second poll.
        assert_eq!(reader.poll_external_changes().unwrap(), 0);
    }

    #[test]
    fn own_writes_are_not_reported() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        let (callback, seen) = recorder();
        storage.subscribe("books", callback).unwrap();

        storage.set("books", &json!(["Foo"])).unwrap();

        assert_eq!(storage.poll_external_changes().unwrap(), 0);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn rejects_invalid_keys() {
        let dir = tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(matches!(
            storage.set("../escape", &json!(1)),
            Err(StorageError::InvalidKey { .. })
        ));
    }
}
