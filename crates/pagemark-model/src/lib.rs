//! Record types shared across the Pagemark crates.
//!
//! # Module Organization
//!
//! - [`book`]: tracked books and their identifiers
//! - [`progress`]: logged page ranges (progress entries)
//! - [`validation`]: input checks applied before any record is created or edited
//!
//! Records serialize with camelCase keys so the persisted JSON stays stable:
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use pagemark_model::{Book, BookId};
//!
//! let book = Book {
//!     id: BookId::new("b1"),
//!     title: "Foo".to_string(),
//!     total_page_count: 200,
//!     price: 1000.0,
//!     created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
//! };
//!
//! assert_eq!(book.id.as_str(), "b1");
//! ```

pub mod book;
pub mod progress;
pub mod validation;

pub use book::{Book, BookId};
pub use progress::{EntryId, PageRange, ProgressEntry};
pub use validation::{
    ValidationError, validate_page_count, validate_page_range, validate_price, validate_title,
};
