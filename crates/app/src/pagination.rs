//! Pagination requests and paged results.

use serde::Serialize;

/// Default page size when a client does not ask for one.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;

/// Upper bound on page size.
pub const MAX_PAGE_LIMIT: u32 = 100;

/// A requested page. Values below one are clamped to one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    #[must_use]
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(DEFAULT_PAGE_LIMIT)
                .clamp(1, MAX_PAGE_LIMIT),
        }
    }

    #[must_use]
    pub const fn page(self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(self) -> u32 {
        self.limit
    }

    /// Row offset of the first item on this page.
    #[must_use]
    pub fn offset(self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results plus navigation metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub previous_page: bool,
    pub next_page: bool,
    pub total_items: u64,
    pub current_page_items: usize,
    pub data: Vec<T>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(request: PageRequest, total_items: u64, data: Vec<T>) -> Self {
        let total_pages = total_items.div_ceil(u64::from(request.limit));

        Self {
            page: request.page,
            limit: request.limit,
            total_pages,
            previous_page: request.page > 1,
            next_page: u64::from(request.page) < total_pages,
            total_items,
            current_page_items: data.len(),
            data,
        }
    }

    /// Transform every item, keeping the metadata.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            page: self.page,
            limit: self.limit,
            total_pages: self.total_pages,
            previous_page: self.previous_page,
            next_page: self.next_page,
            total_items: self.total_items,
            current_page_items: self.current_page_items,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}
