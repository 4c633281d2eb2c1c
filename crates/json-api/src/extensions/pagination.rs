//! Pagination query parameters and metadata.

use salvo::oapi::{ToSchema, extract::QueryParam};
use serde::{Deserialize, Serialize};

use bookshelf_app::pagination::{Page, PageRequest};

/// Build a page request from the optional `?page=&limit=` parameters.
pub(crate) fn page_request(page: QueryParam<u32, false>, limit: QueryParam<u32, false>) -> PageRequest {
    PageRequest::new(page.into_inner(), limit.into_inner())
}

/// Navigation metadata for a list response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaginationResponse {
    pub page: u32,
    pub limit: u32,
    pub total_pages: u64,
    pub previous_page: bool,
    pub next_page: bool,
    pub total_items: u64,
    pub current_page_items: usize,
}

impl<T> From<&Page<T>> for PaginationResponse {
    fn from(page: &Page<T>) -> Self {
        Self {
            page: page.page,
            limit: page.limit,
            total_pages: page.total_pages,
            previous_page: page.previous_page,
            next_page: page.next_page,
            total_items: page.total_items,
            current_page_items: page.current_page_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metadata_mirrors_page() {
        let page = Page::new(PageRequest::new(Some(2), Some(5)), 12, vec!["a", "b", "c", "d", "e"]);

        let meta = PaginationResponse::from(&page);

        assert_eq!(meta.page, 2);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.previous_page);
        assert!(meta.next_page);
        assert_eq!(meta.current_page_items, 5);
    }
}
