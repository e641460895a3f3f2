//! Subscription registry shared by the storage backends.

use crate::adapter::{ChangeCallback, SubscriptionId};

struct Subscriber {
    id: SubscriptionId,
    key: String,
    /// Handle that registered the callback; it is skipped for its own writes.
    owner: u64,
    callback: ChangeCallback,
}

#[derive(Default)]
pub(crate) struct Subscribers {
    next_id: u64,
    entries: Vec<Subscriber>,
}

impl Subscribers {
    pub(crate) fn add(&mut self, owner: u64, key: &str, callback: ChangeCallback) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId::new(self.next_id);
        self.entries.push(Subscriber {
            id,
            key: key.to_string(),
            owner,
            callback,
        });
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|s| s.id != id);
        self.entries.len() != before
    }

    /// Callbacks interested in `key`, excluding those registered by `writer`.
    ///
    /// Callbacks are cloned out so they can run after the caller releases
    /// its lock.
    pub(crate) fn interested(&self, key: &str, writer: Option<u64>) -> Vec<ChangeCallback> {
        self.entries
            .iter()
            .filter(|s| s.key == key && Some(s.owner) != writer)
            .map(|s| s.callback.clone())
            .collect()
    }

    /// Distinct keys that currently have at least one subscriber.
    pub(crate) fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.iter().map(|s| s.key.clone()).collect();
        keys.sort();
        keys.dedup();
        keys
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use std::sync::Arc;

    fn noop() -> ChangeCallback {
        Arc::new(|_: &str, _: &Value| {})
    }

    #[test]
    fn writer_is_excluded() {
        let mut subs = Subscribers::default();
        subs.add(1, "books", noop());
        subs.add(2, "books", noop());
        subs.add(2, "book-progresses", noop());

        assert_eq!(subs.interested("books", Some(1)).len(), 1);
        assert_eq!(subs.interested("books", None).len(), 2);
        assert_eq!(subs.keys(), vec!["book-progresses", "books"]);
    }

    #[test]
    fn remove_unknown_id_is_noop() {
        let mut subs = Subscribers::default();
        let id = subs.add(1, "books", noop());
        assert!(subs.remove(id));
        assert!(!subs.remove(id));
        assert_eq!(subs.len(), 0);
    }
}
