//! In-memory storage backend.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::adapter::{ChangeCallback, Storage, SubscriptionId};
use crate::error::{Result, StorageError};
use crate::keys::validate_key;
use crate::subscribers::Subscribers;

#[derive(Default)]
struct Shared {
    values: HashMap<String, Value>,
    subscribers: Subscribers,
    next_handle: u64,
    /// When set, every write fails with this reason.
    write_failure: Option<String>,
}

/// Process-local storage.
///
/// Each handle behaves like one open window over the same backend: handles
/// obtained through [`MemoryStorage::connect`] see each other's writes and
/// receive change notifications for them.
pub struct MemoryStorage {
    handle: u64,
    shared: Arc<Mutex<Shared>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("handle", &self.handle)
            .finish_non_exhaustive()
    }
}

impl MemoryStorage {
    /// Create an empty backend and its first handle.
    pub fn new() -> Self {
        Self {
            handle: 0,
            shared: Arc::new(Mutex::new(Shared {
                next_handle: 1,
                ..Shared::default()
            })),
        }
    }

    /// Open another handle on the same backend.
    pub fn connect(&self) -> Result<Self> {
        let mut shared = self.lock()?;
        let handle = shared.next_handle;
        shared.next_handle += 1;
        Ok(Self {
            handle,
            shared: Arc::clone(&self.shared),
        })
    }

    /// Make every subsequent write fail (`Some(reason)`) or succeed (`None`).
    ///
    /// Models a full or read-only backend.
    pub fn reject_writes(&self, reason: Option<&str>) -> Result<()> {
        self.lock()?.write_failure = reason.map(str::to_string);
        Ok(())
    }

    /// Number of live subscriptions across all handles.
    pub fn subscriber_count(&self) -> Result<usize> {
        Ok(self.lock()?.subscribers.len())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Shared>> {
        self.shared.lock().map_err(|_| StorageError::Unavailable {
            reason: "storage lock poisoned".to_string(),
        })
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;
        Ok(self.lock()?.values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &Value) -> Result<()> {
        validate_key(key)?;
        let callbacks = {
            let mut shared = self.lock()?;
            if let Some(reason) = &shared.write_failure {
                tracing::warn!(key, reason = %reason, "rejected write");
                return Err(StorageError::Unavailable {
                    reason: reason.clone(),
                });
            }
            shared.values.insert(key.to_string(), value.clone());
            shared.subscribers.interested(key, Some(self.handle))
        };

        for callback in callbacks {
            callback(key, value);
        }
        Ok(())
    }

    fn subscribe(&self, key: &str, callback: ChangeCallback) -> Result<SubscriptionId> {
        validate_key(key)?;
        Ok(self.lock()?.subscribers.add(self.handle, key, callback))
    }

    fn unsubscribe(&self, id: SubscriptionId) {
        if let Ok(mut shared) = self.lock() {
            shared.subscribers.remove(id);
        }
    }
}
