//! Per-book progress ledger.

use std::collections::BTreeMap;
use std::sync::Arc;

use pagemark_model::{Book, BookId, EntryId, ProgressEntry, validate_page_range};
use pagemark_storage::{PROGRESSES_KEY, Storage, StorageExt};

use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::ids::IdGenerator;
use crate::metrics::{Metrics, compute_metrics};

type Entries = BTreeMap<BookId, Vec<ProgressEntry>>;

/// Progress entries for every book, persisted under [`PROGRESSES_KEY`] as a
/// book id -> entry list mapping.
///
/// Entries keep insertion order. Edits are persist-then-commit, like
/// [`crate::BookStore`].
pub struct ProgressLedger {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    entries: Entries,
}

impl std::fmt::Debug for ProgressLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressLedger")
            .field("entries", &self.entries)
            .finish_non_exhaustive()
    }
}

impl ProgressLedger {
    pub fn load(
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self> {
        let mut entries: Entries = storage.load(PROGRESSES_KEY)?.unwrap_or_default();
        attach_book_ids(&mut entries);
        tracing::debug!(books = entries.len(), "loaded progress ledger");
        Ok(Self {
            storage,
            clock,
            ids,
            entries,
        })
    }

    /// Entries for `book_id` in insertion order.
    pub fn entries(&self, book_id: &BookId) -> &[ProgressEntry] {
        self.entries.get(book_id).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn entry(&self, book_id: &BookId, entry_id: &EntryId) -> Option<&ProgressEntry> {
        self.entries(book_id).iter().find(|e| &e.id == entry_id)
    }

    /// Suggested start page for the next entry: one past the last entry's
    /// end page, or `1` for an empty ledger. Advisory only.
    pub fn next_from_page(&self, book_id: &BookId) -> u32 {
        self.entries(book_id)
            .last()
            .map_or(1, |e| e.to_page_number.saturating_add(1))
    }

    /// Append an enabled entry for `book`.
    ///
    /// Ranges may overlap earlier entries or leave gaps.
    pub fn add_entry(&mut self, book: &Book, from_page: u32, to_page: u32) -> Result<ProgressEntry> {
        let range = validate_page_range(from_page, to_page)?;
        let entry = ProgressEntry {
            id: EntryId::new(self.ids.next_id()),
            book_id: book.id.clone(),
            from_page_number: range.from_page(),
            to_page_number: range.to_page(),
            is_enabled: true,
            created_at: self.clock.now(),
        };

        let mut next = self.entries.clone();
        next.entry(book.id.clone()).or_default().push(entry.clone());
        self.commit(next)?;
        tracing::info!(
            book_id = %book.id,
            entry_id = %entry.id,
            from = entry.from_page_number,
            to = entry.to_page_number,
            "logged progress"
        );
        Ok(entry)
    }

    /// Flip an entry's enabled flag and return the new value.
    pub fn toggle_enabled(&mut self, book_id: &BookId, entry_id: &EntryId) -> Result<bool> {
        let mut next = self.entries.clone();
        let entry = next
            .get_mut(book_id)
            .and_then(|entries| entries.iter_mut().find(|e| &e.id == entry_id))
            .ok_or_else(|| CoreError::entry_not_found(entry_id))?;
        entry.is_enabled = !entry.is_enabled;
        let is_enabled = entry.is_enabled;

        self.commit(next)?;
        tracing::info!(book_id = %book_id, entry_id = %entry_id, is_enabled, "toggled progress");
        Ok(is_enabled)
    }

    /// Remove one entry permanently. Reached through the confirmation gate.
    pub(crate) fn remove_entry(
        &mut self,
        book_id: &BookId,
        entry_id: &EntryId,
    ) -> Result<ProgressEntry> {
        let mut next = self.entries.clone();
        let entries = next
            .get_mut(book_id)
            .ok_or_else(|| CoreError::entry_not_found(entry_id))?;
        let index = entries
            .iter()
            .position(|e| &e.id == entry_id)
            .ok_or_else(|| CoreError::entry_not_found(entry_id))?;
        let removed = entries.remove(index);
        if entries.is_empty() {
            next.remove(book_id);
        }

        self.commit(next)?;
        tracing::info!(book_id = %book_id, entry_id = %entry_id, "deleted progress");
        Ok(removed)
    }

    /// Remove every entry for `book_id` and return how many were removed.
    ///
    /// Clearing an empty ledger is a no-op and does not touch storage.
    pub fn clear_all(&mut self, book_id: &BookId) -> Result<usize> {
        let Some(count) = self.entries.get(book_id).map(Vec::len) else {
            return Ok(0);
        };

        let mut next = self.entries.clone();
        next.remove(book_id);
        self.commit(next)?;
        tracing::info!(book_id = %book_id, count, "cleared progress");
        Ok(count)
    }

    /// Metrics for `book` over its enabled entries.
    pub fn compute_metrics(&self, book: &Book) -> Metrics {
        compute_metrics(book.total_page_count, book.price, self.entries(&book.id))
    }

    /// Overwrite local state with a ledger persisted elsewhere.
    pub(crate) fn replace_all(&mut self, mut entries: BTreeMap<BookId, Vec<ProgressEntry>>) {
        attach_book_ids(&mut entries);
        tracing::debug!(books = entries.len(), "replaced ledger from external change");
        self.entries = entries;
    }

    fn commit(&mut self, next: Entries) -> Result<()> {
        if let Err(error) = self.storage.save(PROGRESSES_KEY, &next) {
            tracing::warn!(%error, "failed to save progress ledger");
            return Err(error.into());
        }
        self.entries = next;
        Ok(())
    }
}

/// The map key is the owning book; stored `bookId` fields may be missing.
fn attach_book_ids(entries: &mut Entries) {
    for (book_id, list) in entries.iter_mut() {
        for entry in list.iter_mut().filter(|e| &e.book_id != book_id) {
            entry.book_id = book_id.clone();
        }
    }
}
