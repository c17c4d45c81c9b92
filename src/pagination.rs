use serde::Serialize;
use thiserror::Error;

/// Page size used when the caller does not ask for a specific one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 6;
/// Largest page a caller may request.
pub const MAX_ITEMS_PER_PAGE: usize = 100;

/// A requested window that cannot be served.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaginationError {
    #[error("limit must not exceed {MAX_ITEMS_PER_PAGE}")]
    LimitTooLarge,
    #[error("page is out of range")]
    PageOutOfRange,
}

/// Requested window over an ordered result set (pages are 1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    /// Window for raw `page`/`limit` parameters. Absent or zero values fall
    /// back to the first page and the default page size.
    pub fn from_params(page: Option<usize>, limit: Option<usize>) -> Result<Self, PaginationError> {
        let page = page.unwrap_or(1).max(1);
        let per_page = limit
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_ITEMS_PER_PAGE);
        if per_page > MAX_ITEMS_PER_PAGE {
            return Err(PaginationError::LimitTooLarge);
        }

        let skipped = (page - 1)
            .checked_mul(per_page)
            .and_then(|rows| i64::try_from(rows).ok());
        if skipped.is_none() {
            return Err(PaginationError::PageOutOfRange);
        }

        Ok(Self { page, per_page })
    }

    /// Rows skipped before this page; saturates instead of overflowing.
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1)
            .checked_mul(self.per_page)
            .and_then(|rows| i64::try_from(rows).ok())
            .unwrap_or(i64::MAX)
    }

    pub fn limit(&self) -> i64 {
        i64::try_from(self.per_page).unwrap_or(i64::MAX)
    }
}

/// A single page of results together with the size of the full result set.
#[derive(Debug, Clone, Serialize)]
pub struct Paginated<T> {
    pub count: usize,
    pub page: usize,
    pub pages: usize,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    pub fn new(results: Vec<T>, page: usize, per_page: usize, count: usize) -> Self {
        let pages = if per_page == 0 {
            0
        } else {
            count.div_ceil(per_page)
        };
        Self {
            count,
            page: page.max(1),
            pages,
            results,
        }
    }
}
