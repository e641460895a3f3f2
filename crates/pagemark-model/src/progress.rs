//! Logged reading sessions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::book::BookId;

/// Opaque progress entry identifier, unique within its book's ledger.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Inclusive page range. Construct through [`crate::validate_page_range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    from: u32,
    to: u32,
}

impl PageRange {
    pub(crate) fn new_unchecked(from: u32, to: u32) -> Self {
        Self { from, to }
    }

    pub fn from_page(&self) -> u32 {
        self.from
    }

    pub fn to_page(&self) -> u32 {
        self.to
    }

    /// Number of pages covered, both ends included.
    pub fn len(&self) -> u64 {
        u64::from(self.to - self.from) + 1
    }

    /// Always false: a range covers at least one page.
    pub fn is_empty(&self) -> bool {
        false
    }
}

/// One logged page range for a book.
///
/// Disabled entries stay in the ledger but do not count toward metrics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: EntryId,
    /// Owning book. Older records omit it; the ledger fills it from the
    /// map key they are stored under.
    #[serde(default)]
    pub book_id: BookId,
    pub from_page_number: u32,
    pub to_page_number: u32,
    pub is_enabled: bool,
    pub created_at: DateTime<Utc>,
}

impl ProgressEntry {
    /// Pages covered by this entry regardless of its enabled flag.
    ///
    /// Records loaded from storage are not re-validated, so an inverted
    /// range counts as zero pages instead of underflowing.
    pub fn page_count(&self) -> u64 {
        if self.to_page_number < self.from_page_number {
            return 0;
        }
        u64::from(self.to_page_number - self.from_page_number) + 1
    }

    /// Pages this entry contributes to the pages-read measure.
    pub fn pages_read(&self) -> u64 {
        if self.is_enabled { self.page_count() } else { 0 }
    }
}
