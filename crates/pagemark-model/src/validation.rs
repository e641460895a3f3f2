//! Input validation for book and progress intents.
//!
//! Every check runs before state is touched, so a failed check never leaves
//! a partial edit behind.

use thiserror::Error;

use crate::book::BookId;
use crate::progress::PageRange;

/// Rejected input shape or value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Title is empty or whitespace only.
    #[error("Book title must not be empty")]
    EmptyTitle,

    /// Total page count must be at least one.
    #[error("Total page count must be positive (got {0})")]
    NonPositivePageCount(i64),

    /// Price is negative, NaN or infinite.
    #[error("Price must be a non-negative number (got {0})")]
    InvalidPrice(f64),

    /// Page numbers start at 1.
    #[error("Page numbers start at 1 (got start page 0)")]
    PageZero,

    /// End page lies before the start page.
    #[error("End page {to} is before start page {from}")]
    InvertedRange { from: u32, to: u32 },

    /// Progress was logged against a book that does not exist.
    #[error("No book with id {0} to log progress against")]
    UnknownBook(BookId),
}

/// Check a display title and return it trimmed.
pub fn validate_title(title: &str) -> Result<String, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

/// Check a total page count coming from user input.
pub fn validate_page_count(total_page_count: i64) -> Result<u32, ValidationError> {
    if total_page_count <= 0 {
        return Err(ValidationError::NonPositivePageCount(total_page_count));
    }
    u32::try_from(total_page_count)
        .map_err(|_| ValidationError::NonPositivePageCount(total_page_count))
}

/// Check a price.
pub fn validate_price(price: f64) -> Result<f64, ValidationError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ValidationError::InvalidPrice(price));
    }
    Ok(price)
}

/// Check an inclusive, 1-based page range.
pub fn validate_page_range(from: u32, to: u32) -> Result<PageRange, ValidationError> {
    if from == 0 {
        return Err(ValidationError::PageZero);
    }
    if to < from {
        return Err(ValidationError::InvertedRange { from, to });
    }
    Ok(PageRange::new_unchecked(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed() {
        assert_eq!(validate_title("  Foo ").unwrap(), "Foo");
        assert_eq!(validate_title("   "), Err(ValidationError::EmptyTitle));
        assert_eq!(validate_title(""), Err(ValidationError::EmptyTitle));
    }

    #[test]
    fn page_count_must_be_positive() {
        assert_eq!(validate_page_count(200).unwrap(), 200);
        assert_eq!(
            validate_page_count(0),
            Err(ValidationError::NonPositivePageCount(0))
        );
        assert_eq!(
            validate_page_count(-3),
            Err(ValidationError::NonPositivePageCount(-3))
        );
        assert!(validate_page_count(i64::from(u32::MAX) + 1).is_err());
    }

    #[test]
    fn price_must_be_finite_and_non_negative() {
        assert_eq!(validate_price(0.0).unwrap(), 0.0);
        assert_eq!(validate_price(1250.5).unwrap(), 1250.5);
        assert!(validate_price(-1.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(f64::INFINITY).is_err());
    }

    #[test]
    fn range_allows_single_page() {
        let range = validate_page_range(5, 5).unwrap();
        assert_eq!(range.len(), 1);
        assert_eq!(
            validate_page_range(10, 9),
            Err(ValidationError::InvertedRange { from: 10, to: 9 })
        );
    }

    #[test]
    fn range_starts_at_page_one() {
        assert_eq!(validate_page_range(0, 10), Err(ValidationError::PageZero));
        assert_eq!(validate_page_range(0, 0), Err(ValidationError::PageZero));
        assert_eq!(validate_page_range(1, 1).unwrap().from_page(), 1);
    }
}
