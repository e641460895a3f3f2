//! Facade consumed by the presentation layer.
//!
//! [`Library`] owns the book store, the progress ledger and the confirmation
//! gate. Non-destructive intents apply immediately. Resizing a book,
//! deleting a book and deleting a progress entry only park an action in the
//! gate; nothing changes until [`Library::confirm`].

use std::collections::BTreeMap;
use std::sync::Arc;

use crossbeam_channel::{Receiver, Sender};
use pagemark_model::{
    Book, BookId, EntryId, ProgressEntry, ValidationError, validate_page_count,
};
use pagemark_storage::{
    BOOKS_KEY, ChangeCallback, PROGRESSES_KEY, Storage, StorageError, SubscriptionId,
};
use serde_json::Value;

use crate::books::BookStore;
use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::gate::{ConfirmationGate, Prompt};
use crate::ids::IdGenerator;
use crate::ledger::ProgressLedger;
use crate::metrics::Metrics;

/// State the confirmation gate acts on.
#[derive(Debug)]
pub struct Shelf {
    pub(crate) books: BookStore,
    pub(crate) ledger: ProgressLedger,
}

impl Shelf {
    pub fn books(&self) -> &BookStore {
        &self.books
    }

    pub fn ledger(&self) -> &ProgressLedger {
        &self.ledger
    }
}

/// A write to a watched key made through another storage handle.
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalChange {
    pub key: String,
    pub value: Value,
}

/// Book store, progress ledger and confirmation gate behind one API.
pub struct Library {
    storage: Arc<dyn Storage>,
    shelf: Shelf,
    gate: ConfirmationGate<Shelf, CoreError>,
    changes: Receiver<ExternalChange>,
    subscriptions: Vec<SubscriptionId>,
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("shelf", &self.shelf)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl Library {
    /// Load both collections and start listening for external changes.
    pub fn open(
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self> {
        let books = BookStore::load(storage.clone(), clock.clone(), ids.clone())?;
        let ledger = ProgressLedger::load(storage.clone(), clock, ids)?;

        let (sender, changes) = crossbeam_channel::unbounded();
        let mut subscriptions = Vec::with_capacity(2);
        for key in [BOOKS_KEY, PROGRESSES_KEY] {
            subscriptions.push(storage.subscribe(key, forward_to(sender.clone()))?);
        }

        tracing::info!(
            books = books.books().len(),
            "opened library"
        );
        Ok(Self {
            storage,
            shelf: Shelf { books, ledger },
            gate: ConfirmationGate::new(),
            changes,
            subscriptions,
        })
    }

    pub fn shelf(&self) -> &Shelf {
        &self.shelf
    }

    /// Books ordered by creation time, optionally filtered by a
    /// case-sensitive title substring.
    pub fn list_books(&self, filter: Option<&str>) -> Vec<Book> {
        self.shelf.books.list(filter)
    }

    pub fn book(&self, id: &BookId) -> Option<&Book> {
        self.shelf.books.get(id)
    }

    /// Entries for a book in insertion order.
    pub fn entries(&self, book_id: &BookId) -> &[ProgressEntry] {
        self.shelf.ledger.entries(book_id)
    }

    pub fn next_from_page(&self, book_id: &BookId) -> u32 {
        self.shelf.ledger.next_from_page(book_id)
    }

    pub fn metrics(&self, book_id: &BookId) -> Result<Metrics> {
        let book = self.shelf.books.require(book_id)?;
        Ok(self.shelf.ledger.compute_metrics(book))
    }

    pub fn create_book(&mut self, title: &str, total_page_count: i64, price: f64) -> Result<Book> {
        self.shelf.books.create(title, total_page_count, price)
    }

    pub fn rename_book(&mut self, id: &BookId, title: &str) -> Result<()> {
        self.shelf.books.rename(id, title)
    }

    pub fn reprice_book(&mut self, id: &BookId, price: f64) -> Result<()> {
        self.shelf.books.reprice(id, price)
    }

    /// Ask to change a book's page count.
    ///
    /// On confirmation the book's progress is cleared first and the page
    /// count updated second, so a failure in between never pairs old
    /// entries with the new count.
    pub fn resize_book(&mut self, id: &BookId, total_page_count: i64) -> Result<Prompt> {
        let book = self.shelf.books.require(id)?;
        let total_page_count = validate_page_count(total_page_count)?;
        let prompt = Prompt::new(
            "Edit total page count",
            format!(
                "Editing the total page count deletes all logged reading progress. \
                 Continue? Current total page count: {}",
                book.total_page_count
            ),
        );

        let id = id.clone();
        self.gate.request(prompt.clone(), move |shelf: &mut Shelf| {
            shelf.ledger.clear_all(&id)?;
            shelf.books.set_total_page_count(&id, total_page_count)
        })?;
        Ok(prompt)
    }

    /// Ask to delete a book together with all of its progress.
    pub fn delete_book(&mut self, id: &BookId) -> Result<Prompt> {
        let book = self.shelf.books.require(id)?;
        let prompt = Prompt::new(
            "Delete book",
            format!(
                "Deleting book '{}' and all of its reading progress. Continue?",
                book.title
            ),
        );

        let id = id.clone();
        self.gate.request(prompt.clone(), move |shelf: &mut Shelf| {
            shelf.ledger.clear_all(&id)?;
            shelf.books.remove(&id).map(drop)
        })?;
        Ok(prompt)
    }

    /// Log a page range for an existing book.
    pub fn add_entry(&mut self, book_id: &BookId, from_page: u32, to_page: u32) -> Result<ProgressEntry> {
        let book = self
            .shelf
            .books
            .get(book_id)
            .ok_or_else(|| ValidationError::UnknownBook(book_id.clone()))?;
        self.shelf.ledger.add_entry(book, from_page, to_page)
    }

    /// Flip an entry between counted and excluded. Needs no confirmation.
    pub fn toggle_enabled(&mut self, book_id: &BookId, entry_id: &EntryId) -> Result<bool> {
        self.shelf.ledger.toggle_enabled(book_id, entry_id)
    }

    /// Ask to delete one progress entry.
    pub fn delete_entry(&mut self, book_id: &BookId, entry_id: &EntryId) -> Result<Prompt> {
        let entry = self
            .shelf
            .ledger
            .entry(book_id, entry_id)
            .ok_or_else(|| CoreError::entry_not_found(entry_id))?;
        let prompt = Prompt::new(
            "Delete reading progress",
            format!(
                "Deleting the reading progress logged at {}. Continue?",
                entry.created_at.format("%Y-%m-%d %H:%M:%S")
            ),
        );

        let book_id = book_id.clone();
        let entry_id = entry_id.clone();
        self.gate.request(prompt.clone(), move |shelf: &mut Shelf| {
            shelf.ledger.remove_entry(&book_id, &entry_id).map(drop)
        })?;
        Ok(prompt)
    }

    /// Prompt waiting for an answer, if any.
    pub fn prompt(&self) -> Option<&Prompt> {
        self.gate.prompt()
    }

    /// Run the pending action.
    ///
    /// Queued external changes are applied first, so a cascade also covers
    /// entries another window logged since the last sync.
    pub fn confirm(&mut self) -> Result<Prompt> {
        if self.gate.is_pending() {
            self.sync_external_changes()?;
        }
        self.gate.confirm(&mut self.shelf)
    }

    /// Drop the pending action without touching any state.
    pub fn cancel(&mut self) -> Result<Prompt> {
        Ok(self.gate.cancel(&mut self.shelf)?)
    }

    /// Apply writes made through other storage handles since the last call.
    ///
    /// Local state for a changed key is overwritten wholesale (last writer
    /// wins); concurrent edits are not merged. Returns the number of changes
    /// applied.
    pub fn sync_external_changes(&mut self) -> Result<usize> {
        let mut applied = 0;
        while let Ok(change) = self.changes.try_recv() {
            match change.key.as_str() {
                BOOKS_KEY => {
                    let books: Vec<Book> = decode(BOOKS_KEY, change.value)?;
                    self.shelf.books.replace_all(books);
                }
                PROGRESSES_KEY => {
                    let entries: BTreeMap<BookId, Vec<ProgressEntry>> =
                        decode(PROGRESSES_KEY, change.value)?;
                    self.shelf.ledger.replace_all(entries);
                }
                other => {
                    tracing::debug!(key = other, "ignored change to unwatched key");
                    continue;
                }
            }
            applied += 1;
        }
        if applied > 0 {
            tracing::info!(applied, "applied external changes");
        }
        Ok(applied)
    }
}

impl Drop for Library {
    fn drop(&mut self) {
        for id in self.subscriptions.drain(..) {
            self.storage.unsubscribe(id);
        }
    }
}

fn forward_to(sender: Sender<ExternalChange>) -> ChangeCallback {
    Arc::new(move |key: &str, value: &Value| {
        let change = ExternalChange {
            key: key.to_string(),
            value: value.clone(),
        };
        if sender.send(change).is_err() {
            tracing::debug!(key, "library closed, dropping external change");
        }
    })
}

fn decode<T: serde::de::DeserializeOwned>(key: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|source| {
        CoreError::Storage(StorageError::Deserialization {
            key: key.to_string(),
            source,
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::gate::GateError;
    use crate::ids::SequentialIds;
    use pagemark_storage::MemoryStorage;

    fn library() -> Library {
        Library::open(
            Arc::new(MemoryStorage::new()),
            Arc::new(ManualClock::default()),
            Arc::new(SequentialIds::new("id")),
        )
        .unwrap()
    }

    #[test]
    fn add_entry_for_unknown_book_is_validation_error() {
        let mut library = library();
        let error = library.add_entry(&BookId::new("ghost"), 1, 2).unwrap_err();
        assert!(matches!(
            error,
            CoreError::Validation(ValidationError::UnknownBook(_))
        ));
    }

    #[test]
    fn resize_validates_before_prompting() {
        let mut library = library();
        let book = library.create_book("Foo", 200, 1000.0).unwrap();

        assert!(matches!(
            library.resize_book(&book.id, 0),
            Err(CoreError::Validation(_))
        ));
        assert!(matches!(
            library.resize_book(&BookId::new("ghost"), 10),
            Err(CoreError::NotFound { .. })
        ));
        assert!(library.prompt().is_none());
    }

    #[test]
    fn prompts_describe_the_action() {
        let mut library = library();
        let book = library.create_book("Foo", 200, 1000.0).unwrap();

        let prompt = library.delete_book(&book.id).unwrap();
        assert_eq!(prompt.title, "Delete book");
        assert!(prompt.description.contains("'Foo'"));
        assert_eq!(library.prompt(), Some(&prompt));
        library.cancel().unwrap();

        let prompt = library.resize_book(&book.id, 300).unwrap();
        assert!(prompt.description.ends_with("Current total page count: 200"));
    }

    #[test]
    fn second_destructive_request_is_rejected() {
        let mut library = library();
        let book = library.create_book("Foo", 200, 1000.0).unwrap();
        library.delete_book(&book.id).unwrap();

        let error = library.resize_book(&book.id, 10).unwrap_err();
        assert!(matches!(
            error,
            CoreError::Gate(GateError::AlreadyPending { .. })
        ));
        assert_eq!(library.prompt().unwrap().title, "Delete book");
    }

    #[test]
    fn confirm_while_idle_is_an_error() {
        let mut library = library();
        assert!(matches!(
            library.confirm(),
            Err(CoreError::Gate(GateError::NothingPending))
        ));
        assert!(matches!(
            library.cancel(),
            Err(CoreError::Gate(GateError::NothingPending))
        ));
    }

    #[test]
    fn dropping_library_unsubscribes() {
        let storage = Arc::new(MemoryStorage::new());
        let library = Library::open(
            storage.clone(),
            Arc::new(ManualClock::default()),
            Arc::new(SequentialIds::new("id")),
        )
        .unwrap();
        assert_eq!(storage.subscriber_count().unwrap(), 2);

        drop(library);
        assert_eq!(storage.subscriber_count().unwrap(), 0);
    }
}
