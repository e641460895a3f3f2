//! Error taxonomy for the reading progress engine.

use std::fmt;

use pagemark_model::ValidationError;
use pagemark_storage::StorageError;
use thiserror::Error;

use crate::gate::GateError;

/// Kind of record an id referred to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Book,
    ProgressEntry,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Book => f.write_str("Book"),
            Self::ProgressEntry => f.write_str("Progress entry"),
        }
    }
}

/// Errors surfaced by [`crate::Library`] and the stores behind it.
///
/// Validation, not-found and gate errors are raised before any state
/// changes. A storage error means the failing write was not committed. For
/// a confirmed resize or book delete, the progress clear may already have
/// been committed when the later book write fails.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{kind} not found: {id}")]
    NotFound { kind: RecordKind, id: String },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Gate(#[from] GateError),
}

impl CoreError {
    pub(crate) fn book_not_found(id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind: RecordKind::Book,
            id: id.to_string(),
        }
    }

    pub(crate) fn entry_not_found(id: impl fmt::Display) -> Self {
        Self::NotFound {
            kind: RecordKind::ProgressEntry,
            id: id.to_string(),
        }
    }
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
