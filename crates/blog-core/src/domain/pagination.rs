//! Page-number pagination over the post listing.

use serde::Serialize;

use crate::error::DomainError;

/// A bounded window into the ordered post listing.
///
/// Both bounds lie in `0..=i64::MAX`, the range a SQL `BIGINT` can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    limit: u64,
    offset: u64,
}

impl PageWindow {
    /// Build a window, rejecting negative bounds.
    pub fn new(limit: i64, offset: i64) -> Result<Self, DomainError> {
        let limit = u64::try_from(limit)
            .map_err(|_| DomainError::InvalidPage(format!("limit must not be negative: {limit}")))?;
        let offset = u64::try_from(offset).map_err(|_| {
            DomainError::InvalidPage(format!("offset must not be negative: {offset}"))
        })?;

        Ok(Self { limit, offset })
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }
}

const MAX_BOUND: u64 = i64::MAX as u64;

/// Translates a 1-based page number into a [`PageWindow`] plus neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Paginator {
    pub page: u64,
    limit: u64,
    offset: u64,
    pub total_pages: u64,
    pub previous: Option<u64>,
    pub next: Option<u64>,
}

impl Paginator {
    /// Pages below 1 are treated as page 1. A page whose offset would not
    /// fit a `BIGINT` is rejected.
    pub fn new(page: i64, records_per_page: i64, total_records: u64) -> Result<Self, DomainError> {
        let limit = u64::try_from(records_per_page)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                DomainError::InvalidPage(format!(
                    "records per page must be positive: {records_per_page}"
                ))
            })?;
        let page = u64::try_from(page).unwrap_or(0).max(1);
        let total_pages = total_records.div_ceil(limit);
        let offset = limit
            .checked_mul(page - 1)
            .filter(|offset| *offset <= MAX_BOUND)
            .ok_or_else(|| DomainError::InvalidPage(format!("page out of range: {page}")))?;

        Ok(Self {
            page,
            limit,
            offset,
            total_pages,
            previous: (page > 1).then(|| page - 1),
            next: (page < total_pages).then(|| page + 1),
        })
    }

    /// Whether the page lies beyond the last page of a non-empty listing.
    pub fn is_past_end(&self) -> bool {
        self.page > self.total_pages.max(1)
    }

    pub fn window(&self) -> PageWindow {
        PageWindow {
            limit: self.limit,
            offset: self.offset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_page() {
        let paginator = Paginator::new(1, 4, 10).unwrap();
        assert_eq!(paginator.offset, 0);
        assert_eq!(paginator.limit, 4);
        assert_eq!(paginator.total_pages, 3);
        assert_eq!(paginator.previous, None);
        assert_eq!(paginator.next, Some(2));
    }

    #[test]
    fn test_last_page() {
        let paginator = Paginator::new(3, 4, 10).unwrap();
        assert_eq!(paginator.offset, 8);
        assert_eq!(paginator.previous, Some(2));
        assert_eq!(paginator.next, None);
    }

    #[test]
    fn test_page_below_one_is_first_page() {
        assert_eq!(Paginator::new(0, 4, 10).unwrap().page, 1);
        assert_eq!(Paginator::new(-5, 4, 10).unwrap().offset, 0);
    }

    #[test]
    fn test_empty_listing_has_no_neighbours() {
        let paginator = Paginator::new(1, 4, 0).unwrap();
        assert_eq!(paginator.total_pages, 0);
        assert_eq!(paginator.previous, None);
        assert_eq!(paginator.next, None);
    }

    #[test]
    fn test_records_per_page_must_be_positive() {
        assert!(matches!(
            Paginator::new(1, 0, 10),
            Err(DomainError::InvalidPage(_))
        ));
    }

    #[test]
    fn test_page_past_end() {
        assert!(!Paginator::new(1, 4, 0).unwrap().is_past_end());
        assert!(!Paginator::new(3, 4, 10).unwrap().is_past_end());
        assert!(Paginator::new(4, 4, 10).unwrap().is_past_end());
    }

    #[test]
    fn test_offset_beyond_bigint_is_rejected() {
        assert!(matches!(
            Paginator::new(i64::MAX, 4, 0),
            Err(DomainError::InvalidPage(_))
        ));
        assert!(matches!(
            Paginator::new((1 << 61) + 2, 4, 0),
            Err(DomainError::InvalidPage(_))
        ));

        let largest = Paginator::new(i64::MAX, 1, 0).unwrap().window();
        assert_eq!(largest.offset(), MAX_BOUND - 1);
        assert_eq!(largest.limit(), 1);
    }

    #[test]
    fn test_window_rejects_negative_bounds() {
        assert!(PageWindow::new(-1, 0).is_err());
        assert!(PageWindow::new(2, -3).is_err());
        let window = PageWindow::new(2, 0).unwrap();
        assert_eq!((window.limit(), window.offset()), (2, 0));
    }
}
