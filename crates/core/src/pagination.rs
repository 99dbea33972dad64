//! Page-number pagination helpers for list endpoints.
//!
//! List endpoints take `?page=&page_size=` (1-based page). Out-of-range values
//! are rejected rather than clamped so clients learn about bad input.

use crate::error::CoreError;

/// Page returned when none is requested.
pub const DEFAULT_PAGE: i64 = 1;

/// Page size used when none is requested.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Largest page size a client may request.
pub const MAX_PAGE_SIZE: i64 = 100;

/// A validated page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Apply defaults and validate bounds: `page >= 1`, `1 <= page_size <= MAX_PAGE_SIZE`.
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Result<Self, CoreError> {
        let page = page.unwrap_or(DEFAULT_PAGE);
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

        if page < 1 {
            return Err(CoreError::Validation(
                "page must be greater than or equal to 1".into(),
            ));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(CoreError::Validation(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        Ok(Self { page, page_size })
    }

    /// Row offset for `LIMIT/OFFSET` queries.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }

    /// Row limit for `LIMIT/OFFSET` queries.
    pub fn limit(&self) -> i64 {
        self.page_size
    }
}

/// Number of pages needed to show `total` rows, `page_size` per page.
pub fn total_pages(total: i64, page_size: i64) -> i64 {
    if total <= 0 || page_size <= 0 {
        return 0;
    }
    (total + page_size - 1) / page_size
}
