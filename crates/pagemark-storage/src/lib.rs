//! Storage adapters for Pagemark.
//!
//! The rest of the workspace only needs three things from persistence:
//! read a JSON value by key, write a JSON value by key, and hear about
//! writes made by somebody else (another window, another process).
//! [`Storage`] captures exactly that.
//!
//! # Backends
//!
//! - [`MemoryStorage`]: process-local map. Handles created with
//!   [`MemoryStorage::connect`] share one backend and notify each other,
//!   which is how tests model two open windows.
//! - [`FileStorage`]: one `<key>.json` file per key in a data directory,
//!   written atomically. Foreign writes are detected by content hash when
//!   [`FileStorage::poll_external_changes`] runs.
//!
//! # Example
//!
//! ```
//! use pagemark_storage::{MemoryStorage, Storage, StorageExt};
//!
//! let storage = MemoryStorage::new();
//! storage.save("books", &vec!["Foo".to_string()]).unwrap();
//! let books: Option<Vec<String>> = storage.load("books").unwrap();
//! assert_eq!(books, Some(vec!["Foo".to_string()]));
//! ```
//!
//! # Architecture
//!
//! - `adapter.rs` - the [`Storage`] trait and typed helpers
//! - `subscribers.rs` - subscription registry shared by both backends
//! - `memory.rs` / `file.rs` - backends
//! - `io/` - atomic file writes, reads and content hashing
//! - `error.rs` - error types with user-friendly messages

mod adapter;
mod error;
mod file;
mod io;
mod keys;
mod memory;
mod subscribers;

pub use adapter::{ChangeCallback, Storage, StorageExt, SubscriptionId};
pub use error::{Result, StorageError};
pub use file::FileStorage;
pub use io::{content_hash, read_json_file, write_json_atomic};
pub use keys::{BOOKS_KEY, PROGRESSES_KEY, validate_key};
pub use memory::MemoryStorage;
