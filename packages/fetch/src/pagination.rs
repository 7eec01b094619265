// ABOUTME: Page-boundary metadata for list responses
// ABOUTME: Derives min/max page from the total row count and page size

use serde::Serialize;

/// Minimum page number (1-indexed)
pub const MIN_PAGE: i64 = 1;

/// Where the current page sits within the full result set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    /// Current page number (1-indexed)
    pub page: i64,

    /// Items per page
    pub limit: i64,

    pub min_page: i64,

    /// Last page that holds any rows; 0 for an empty table
    pub max_page: i64,
}

impl PageMeta {
    /// Build metadata for `page` given the total row count.
    ///
    /// `limit` must already be normalized to at least 1.
    pub fn new(page: i64, limit: i64, total_count: i64) -> Self {
        Self {
            page,
            limit,
            min_page: MIN_PAGE,
            max_page: max_page(total_count, limit),
        }
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.max_page
    }

    pub fn has_previous_page(&self) -> bool {
        self.page > self.min_page
    }
}

/// Ceiling of `total_count / limit`
pub fn max_page(total_count: i64, limit: i64) -> i64 {
    debug_assert!(limit > 0, "limit must be normalized before paging");
    if total_count <= 0 {
        return 0;
    }
    (total_count + limit - 1) / limit
}
