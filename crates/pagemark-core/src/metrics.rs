//! Derived reading metrics.
//!
//! Metrics are recomputed from the ledger on every read and never stored.
//!
//! # Rounding
//!
//! - `progress_percent` is floored to one decimal place. The floor is taken
//!   in integer arithmetic (`pages_read * 1000 / total_page_count` tenths),
//!   so identical inputs always give identical output.
//! - `price_consumed` is floored to a whole currency unit.
//!
//! Overlapping or out-of-range entries are legal, so progress above 100 %
//! is reported as-is.

use pagemark_model::ProgressEntry;
use serde::Serialize;

/// Computed progress for one book.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    /// Sum of inclusive range lengths over enabled entries.
    pub pages_read: u64,
    /// `100 * pages_read / total_page_count`, floored to one decimal.
    pub progress_percent: f64,
    /// `price / total_page_count * pages_read`, floored to an integer.
    pub price_consumed: u64,
}

impl Metrics {
    pub const ZERO: Self = Self {
        pages_read: 0,
        progress_percent: 0.0,
        price_consumed: 0,
    };
}

/// Pages read across `entries`, counting enabled entries only.
pub fn pages_read<'a>(entries: impl IntoIterator<Item = &'a ProgressEntry>) -> u64 {
    entries
        .into_iter()
        .fold(0u64, |sum, entry| sum.saturating_add(entry.pages_read()))
}

/// Compute metrics for a book with the given page count and price.
///
/// A zero page count never divides: both ratios come back as zero.
pub fn compute_metrics(total_page_count: u32, price: f64, entries: &[ProgressEntry]) -> Metrics {
    let pages_read = pages_read(entries);
    if total_page_count == 0 || pages_read == 0 {
        return Metrics {
            pages_read,
            ..Metrics::ZERO
        };
    }

    let total = u128::from(total_page_count);
    let tenths = u128::from(pages_read) * 1000 / total;
    let progress_percent = tenths as f64 / 10.0;

    let price_consumed = (price * pages_read as f64 / f64::from(total_page_count)).floor();
    let price_consumed = if price_consumed.is_finite() && price_consumed > 0.0 {
        price_consumed as u64
    } else {
        0
    };

    Metrics {
        pages_read,
        progress_percent,
        price_consumed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pagemark_model::{BookId, EntryId};

    fn entry(from: u32, to: u32, is_enabled: bool) -> ProgressEntry {
        ProgressEntry {
            id: EntryId::new(format!("e{from}-{to}")),
            book_id: BookId::new("b1"),
            from_page_number: from,
            to_page_number: to,
            is_enabled,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn no_entries_is_zero() {
        assert_eq!(compute_metrics(200, 1000.0, &[]), Metrics::ZERO);
    }

    #[test]
    fn half_read() {
        let metrics = compute_metrics(200, 1000.0, &[entry(1, 100, true)]);
        assert_eq!(metrics.pages_read, 100);
        assert_eq!(metrics.progress_percent, 50.0);
        assert_eq!(metrics.price_consumed, 500);
    }

    #[test]
    fn disabled_entries_are_ignored() {
        let metrics = compute_metrics(200, 1000.0, &[entry(1, 100, false), entry(101, 150, true)]);
        assert_eq!(metrics.pages_read, 50);
        assert_eq!(metrics.progress_percent, 25.0);
        assert_eq!(metrics.price_consumed, 250);
    }

    #[test]
    fn percent_is_floored_to_one_decimal() {
        // 1 / 3 of the book = 33.333...%
        let metrics = compute_metrics(300, 1000.0, &[entry(1, 100, true)]);
        assert_eq!(metrics.progress_percent, 33.3);
        assert_eq!(metrics.price_consumed, 333);

        // 2 / 3 = 66.666...% floors, never rounds up
        let metrics = compute_metrics(300, 1000.0, &[entry(1, 200, true)]);
        assert_eq!(metrics.progress_percent, 66.6);
        assert_eq!(metrics.price_consumed, 666);
    }

    #[test]
    fn single_page_counts_once() {
        let metrics = compute_metrics(10, 0.0, &[entry(4, 4, true)]);
        assert_eq!(metrics.pages_read, 1);
        assert_eq!(metrics.progress_percent, 10.0);
        assert_eq!(metrics.price_consumed, 0);
    }

    #[test]
    fn zero_page_count_does_not_divide() {
        let metrics = compute_metrics(0, 1000.0, &[entry(1, 10, true)]);
        assert_eq!(metrics.pages_read, 10);
        assert_eq!(metrics.progress_percent, 0.0);
        assert_eq!(metrics.price_consumed, 0);
    }

    #[test]
    fn overlapping_ranges_can_exceed_total() {
        let metrics = compute_metrics(100, 100.0, &[entry(1, 100, true), entry(50, 100, true)]);
        assert_eq!(metrics.pages_read, 151);
        assert_eq!(metrics.progress_percent, 151.0);
        assert_eq!(metrics.price_consumed, 151);
    }
}
