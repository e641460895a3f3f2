//! Tracked books.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque book identifier, unique within the book collection.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookId(String);

impl BookId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BookId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// A reading target with a page count and a price.
///
/// `id` and `created_at` are fixed at creation. `created_at` is the only
/// sort key used when listing books.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub total_page_count: u32,
    pub price: f64,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Case-sensitive substring match on the title. An empty needle matches.
    pub fn title_matches(&self, needle: &str) -> bool {
        needle.is_empty() || self.title.contains(needle)
    }
}
