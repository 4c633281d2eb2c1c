//! Book Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::{books::data::BookFilter, categories::records::CategoryUuid};

use crate::{
    books::{errors::into_api_error, models::BookResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BooksResponse {
    /// Newest books first
    pub books: Vec<BookResponse>,
    pub pagination: PaginationResponse,
}

/// Book Index Handler
///
/// Lists the catalog, optionally narrowed to a category or a title/author search.
#[endpoint(tags("books"), summary = "List Books")]
pub(crate) async fn handler(
    category: QueryParam<Uuid, false>,
    q: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<BooksResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let filter = BookFilter {
        category: category.into_inner().map(CategoryUuid::from_uuid),
        search: q
            .into_inner()
            .map(|search| search.trim().to_string())
            .filter(|search| !search.is_empty()),
    };

    let books = state
        .app
        .books
        .list_books(filter, page_request(page, limit))
        .await
        .map_err(into_api_error)?;

    let pagination = PaginationResponse::from(&books);

    Ok(Json(BooksResponse {
        books: books.data.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bookshelf_app::{
        domain::books::{MockBooksService, records::BookUuid},
        pagination::{Page, PageRequest},
    };

    use crate::test_helpers::{Mocks, make_book};

    use super::*;

    fn make_service(books: MockBooksService) -> Service {
        Mocks {
            books,
            ..Mocks::default()
        }
        .public_service(Router::with_path("books").get(handler))
    }

    #[tokio::test]
    async fn test_index_passes_filter_and_page() -> TestResult {
        let category = Uuid::now_v7();
        let book = BookUuid::new();

        let mut books = MockBooksService::new();

        books
            .expect_list_books()
            .once()
            .withf(move |filter, page| {
                filter.category == Some(CategoryUuid::from_uuid(category))
                    && filter.search.as_deref() == Some("rust")
                    && *page == PageRequest::new(Some(2), Some(5))
            })
            .return_once(move |_, page| Ok(Page::new(page, 6, vec![make_book(book, 499, 3)])));

        let response: BooksResponse = TestClient::get(format!(
            "http://example.com/books?category={category}&q=%20rust%20&page=2&limit=5"
        ))
        .send(&make_service(books))
        .await
        .take_json()
        .await?;

        assert_eq!(response.books.len(), 1);
        assert_eq!(response.books.first().map(|b| b.uuid), Some(book.into_uuid()));
        assert_eq!(response.pagination.total_pages, 2);
        assert!(response.pagination.previous_page);
        assert!(!response.pagination.next_page);

        Ok(())
    }

    #[tokio::test]
    async fn test_index_defaults_to_first_page() -> TestResult {
        let mut books = MockBooksService::new();

        books
            .expect_list_books()
            .once()
            .withf(|filter, page| *filter == BookFilter::default() && *page == PageRequest::default())
            .return_once(|_, page| Ok(Page::new(page, 0, vec![])));

        let response: BooksResponse = TestClient::get("http://example.com/books")
            .send(&make_service(books))
            .await
            .take_json()
            .await?;

        assert!(response.books.is_empty());
        assert_eq!(response.pagination.page, 1);

        Ok(())
    }
}
