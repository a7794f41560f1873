//! Page-number pagination
//!
//! `page` is 1-based. `page_size` falls back to the configured default and
//! is clamped to the configured maximum. Responses carry the total count
//! and the neighbouring page numbers.

use serde::{Deserialize, Serialize};

use crate::backend::error::BackendError;

const INVALID_PAGE: &str = "Invalid page.";

/// Paginated response body
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub count: i64,
    pub next: Option<u32>,
    pub previous: Option<u32>,
    pub results: Vec<T>,
}

/// A resolved page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: u32,
    pub page_size: u32,
}

impl PageWindow {
    /// Resolve the raw query values against the configured limits
    pub fn resolve(
        page: Option<u32>,
        page_size: Option<u32>,
        default_size: u32,
        max_size: u32,
    ) -> Result<Self, BackendError> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(BackendError::not_found(INVALID_PAGE));
        }
        let page_size = match page_size {
            Some(0) | None => default_size,
            Some(size) => size.min(max_size),
        };
        Ok(Self { page, page_size })
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page - 1) * i64::from(self.page_size)
    }

    /// Reject pages past the end; page 1 is always valid
    pub fn check(&self, count: i64) -> Result<(), BackendError> {
        if self.page > 1 && self.offset() >= count {
            return Err(BackendError::not_found(INVALID_PAGE));
        }
        Ok(())
    }

    pub fn into_page<T>(self, count: i64, results: Vec<T>) -> Page<T> {
        let has_next = self.offset() + i64::from(self.page_size) < count;
        Page {
            count,
            next: has_next.then(|| self.page + 1),
            previous: (self.page > 1).then(|| self.page - 1),
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn test_defaults_and_clamping() {
        let window = PageWindow::resolve(None, None, 10, 100).unwrap();
        assert_eq!(window, PageWindow { page: 1, page_size: 10 });

        let window = PageWindow::resolve(Some(3), Some(500), 10, 100).unwrap();
        assert_eq!(window.page_size, 100);
        assert_eq!(window.offset(), 200);

        let window = PageWindow::resolve(None, Some(0), 10, 100).unwrap();
        assert_eq!(window.page_size, 10);
    }

    #[test]
    fn test_page_zero_is_invalid() {
        let err = PageWindow::resolve(Some(0), None, 10, 100).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Invalid page.");
    }

    #[test]
    fn test_out_of_range() {
        let window = PageWindow::resolve(Some(3), Some(10), 10, 100).unwrap();
        assert!(window.check(20).is_err());
        assert!(window.check(21).is_ok());

        // an empty first page is fine
        let first = PageWindow::resolve(None, None, 10, 100).unwrap();
        assert!(first.check(0).is_ok());
    }

    #[test]
    fn test_neighbours() {
        let page = PageWindow { page: 2, page_size: 10 }.into_page(25, vec![(); 10]);
        assert_eq!(page.previous, Some(1));
        assert_eq!(page.next, Some(3));

        let last = PageWindow { page: 3, page_size: 10 }.into_page(25, vec![(); 5]);
        assert_eq!(last.next, None);

        let only = PageWindow { page: 1, page_size: 10 }.into_page(10, vec![(); 10]);
        assert_eq!(only.next, None);
        assert_eq!(only.previous, None);
    }
}
