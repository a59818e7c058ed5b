//! Pagination parameters and result container

use serde::{Deserialize, Serialize};

/// Pagination parameters for list queries
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed)
    pub page: u32,
    /// Items per page
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 12,
        }
    }
}

impl ListParams {
    /// Create new pagination parameters, clamping out-of-range values
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    /// Zero-based offset of the first item on this page
    pub fn offset(&self) -> usize {
        ((self.page.saturating_sub(1)) * self.per_page) as usize
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    /// Slice a full result set down to one page.
    ///
    /// Out-of-range pages yield an empty item list, not an error.
    pub fn paginate(all: Vec<T>, params: &ListParams) -> Self {
        let total = all.len() as i64;
        let items = all
            .into_iter()
            .skip(params.offset())
            .take(params.per_page as usize)
            .collect();
        Self::new(items, total, params)
    }

    /// Total number of pages, never less than 1
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 1;
        }
        (((self.total.max(0) as u32) + self.per_page - 1) / self.per_page).max(1)
    }

    /// Check if there is a next page
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if there is a previous page
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Check if the current page is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items in the current page
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Map the items to another type, keeping the page metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PagedResult<U> {
        PagedResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}
