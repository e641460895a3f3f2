//! Reading progress engine for Pagemark.
//!
//! This crate owns the rules for books and their logged page ranges:
//!
//! - [`BookStore`]: create, rename, reprice, resize and delete books
//! - [`ProgressLedger`]: per-book ordered progress entries
//! - [`compute_metrics`]: progress percentage and price consumed
//! - [`ConfirmationGate`]: the single pending-action slot guarding
//!   irreversible edits
//! - [`Library`]: the facade the presentation layer talks to; it routes
//!   destructive intents through the gate and keeps both stores in step
//!
//! Storage, clock and id generation are injected so tests stay deterministic.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pagemark_core::{Library, ManualClock, SequentialIds};
//! use pagemark_storage::MemoryStorage;
//!
//! let mut library = Library::open(
//!     Arc::new(MemoryStorage::new()),
//!     Arc::new(ManualClock::default()),
//!     Arc::new(SequentialIds::new("id")),
//! )?;
//!
//! let book = library.create_book("Foo", 200, 1000.0)?;
//! library.add_entry(&book.id, 1, 100)?;
//!
//! let metrics = library.metrics(&book.id)?;
//! assert_eq!(metrics.progress_percent, 50.0);
//! assert_eq!(metrics.price_consumed, 500);
//!
//! // Deleting waits for an explicit confirmation.
//! library.delete_book(&book.id)?;
//! assert_eq!(library.list_books(None).len(), 1);
//! library.confirm()?;
//! assert!(library.list_books(None).is_empty());
//! # Ok::<(), pagemark_core::CoreError>(())
//! ```

pub mod books;
pub mod clock;
pub mod error;
pub mod gate;
pub mod ids;
pub mod ledger;
pub mod library;
pub mod metrics;

pub use books::BookStore;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{CoreError, RecordKind, Result};
pub use gate::{ConfirmationGate, GateError, Prompt};
pub use ids::{IdGenerator, SequentialIds, UuidIds};
pub use ledger::ProgressLedger;
pub use library::{ExternalChange, Library, Shelf};
pub use metrics::{Metrics, compute_metrics, pages_read};

pub use pagemark_model::{Book, BookId, EntryId, ProgressEntry, ValidationError};
