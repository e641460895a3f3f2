//! Book collection.

use std::sync::Arc;

use pagemark_model::{
    Book, BookId, validate_page_count, validate_price, validate_title,
};
use pagemark_storage::{BOOKS_KEY, Storage, StorageExt};

use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::ids::IdGenerator;

/// The book collection, persisted under [`BOOKS_KEY`].
///
/// Every edit builds the next collection, saves it and only then replaces
/// the in-memory copy, so a failed save leaves the store as it was.
///
/// Resizing and deleting are only reachable through [`crate::Library`],
/// which routes them through the confirmation gate.
pub struct BookStore {
    storage: Arc<dyn Storage>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
    books: Vec<Book>,
}

impl std::fmt::Debug for BookStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BookStore")
            .field("books", &self.books)
            .finish_non_exhaustive()
    }
}

impl BookStore {
    /// Load the collection from storage. A missing key is an empty shelf.
    pub fn load(
        storage: Arc<dyn Storage>,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self> {
        let books: Vec<Book> = storage.load(BOOKS_KEY)?.unwrap_or_default();
        tracing::debug!(count = books.len(), "loaded books");
        Ok(Self {
            storage,
            clock,
            ids,
            books,
        })
    }

    /// Books in insertion order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn get(&self, id: &BookId) -> Option<&Book> {
        self.books.iter().find(|b| &b.id == id)
    }

    pub fn require(&self, id: &BookId) -> Result<&Book> {
        self.get(id).ok_or_else(|| CoreError::book_not_found(id))
    }

    /// Fresh list ordered by creation time, oldest first.
    ///
    /// `filter` is a case-sensitive title substring; `None` or an empty
    /// string keeps every book.
    pub fn list(&self, filter: Option<&str>) -> Vec<Book> {
        let needle = filter.unwrap_or_default();
        let mut books: Vec<Book> = self
            .books
            .iter()
            .filter(|b| b.title_matches(needle))
            .cloned()
            .collect();
        books.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        books
    }

    pub fn create(&mut self, title: &str, total_page_count: i64, price: f64) -> Result<Book> {
        let title = validate_title(title)?;
        let total_page_count = validate_page_count(total_page_count)?;
        let price = validate_price(price)?;

        let book = Book {
            id: BookId::new(self.ids.next_id()),
            title,
            total_page_count,
            price,
            created_at: self.clock.now(),
        };

        let mut next = self.books.clone();
        next.push(book.clone());
        self.commit(next)?;
        tracing::info!(book_id = %book.id, title = %book.title, "created book");
        Ok(book)
    }

    pub fn rename(&mut self, id: &BookId, title: &str) -> Result<()> {
        let title = validate_title(title)?;
        self.update(id, |book| book.title = title)?;
        tracing::info!(book_id = %id, "renamed book");
        Ok(())
    }

    pub fn reprice(&mut self, id: &BookId, price: f64) -> Result<()> {
        let price = validate_price(price)?;
        self.update(id, |book| book.price = price)?;
        tracing::info!(book_id = %id, price, "repriced book");
        Ok(())
    }

    /// Set the page count. The caller clears the book's ledger first.
    pub(crate) fn set_total_page_count(&mut self, id: &BookId, total_page_count: u32) -> Result<()> {
        self.update(id, |book| book.total_page_count = total_page_count)?;
        tracing::info!(book_id = %id, total_page_count, "resized book");
        Ok(())
    }

    /// Remove a book. The caller clears the book's ledger first.
    pub(crate) fn remove(&mut self, id: &BookId) -> Result<Book> {
        let index = self
            .books
            .iter()
            .position(|b| &b.id == id)
            .ok_or_else(|| CoreError::book_not_found(id))?;

        let mut next = self.books.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        tracing::info!(book_id = %id, title = %removed.title, "deleted book");
        Ok(removed)
    }

    /// Overwrite local state with a collection persisted elsewhere.
    pub(crate) fn replace_all(&mut self, books: Vec<Book>) {
        tracing::debug!(count = books.len(), "replaced books from external change");
        self.books = books;
    }

    fn update(&mut self, id: &BookId, edit: impl FnOnce(&mut Book)) -> Result<()> {
        let mut next = self.books.clone();
        let book = next
            .iter_mut()
            .find(|b| &b.id == id)
            .ok_or_else(|| CoreError::book_not_found(id))?;
        edit(book);
        self.commit(next)
    }

    fn commit(&mut self, next: Vec<Book>) -> Result<()> {
        if let Err(error) = self.storage.save(BOOKS_KEY, &next) {
            tracing::warn!(%error, "failed to save books");
            return Err(error.into());
        }
        self.books = next;
        Ok(())
    }
}
