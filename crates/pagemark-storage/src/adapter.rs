//! The storage contract shared by every backend.

use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, StorageError};

/// Callback invoked with `(key, new_value)` when another writer changes a key.
pub type ChangeCallback = Arc<dyn Fn(&str, &Value) + Send + Sync>;

/// Handle returned by [`Storage::subscribe`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// Namespaced JSON key-value store with change notification.
///
/// Writes are last-writer-wins per key. Subscribers are told about writes
/// made through *other* handles only; a handle never hears its own writes.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`, or `None` when absent.
    fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the value stored under `key`.
    fn set(&self, key: &str, value: &Value) -> Result<()>;

    /// Register a callback for external changes to `key`.
    fn subscribe(&self, key: &str, callback: ChangeCallback) -> Result<SubscriptionId>;

    /// Drop a subscription. Unknown ids are ignored.
    fn unsubscribe(&self, id: SubscriptionId);
}

/// Typed helpers layered over [`Storage`].
pub trait StorageExt: Storage {
    /// Read and decode the value under `key`.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            None => Ok(None),
            Some(value) => serde_json::from_value(value).map(Some).map_err(|source| {
                StorageError::Deserialization {
                    key: key.to_string(),
                    source,
                }
            }),
        }
    }

    /// Encode `value` and store it under `key`.
    fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).map_err(|source| StorageError::Serialization {
            key: key.to_string(),
            source,
        })?;
        self.set(key, &value)
    }
}

impl<S: Storage + ?Sized> StorageExt for S {}
