//! Storage keys.

use crate::error::{Result, StorageError};

/// Key holding the book collection (a JSON array).
pub const BOOKS_KEY: &str = "books";

/// Key holding the book id -> progress entries mapping (a JSON object).
pub const PROGRESSES_KEY: &str = "book-progresses";

/// Check that a key is usable by every backend.
///
/// Keys double as file names for [`crate::FileStorage`], so they are limited
/// to ASCII alphanumerics plus `-`, `_` and `.`, and may not start with `.`.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey {
            key: key.to_string(),
        })
    }
}
