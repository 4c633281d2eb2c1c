//! Delete Review Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use bookshelf_app::domain::books::records::ReviewUuid;

use crate::{books::into_review_api_error, errors::ApiError, extensions::*, state::State};

/// Delete Review Handler
///
/// Only the review's author may delete it; other users get 404.
#[endpoint(
    tags("reviews"),
    summary = "Delete Review",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Review deleted"),
    ),
)]
#[tracing::instrument(name = "reviews.delete", skip_all, fields(review_uuid = %*review), err)]
pub(crate) async fn handler(
    review: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    state
        .app
        .books
        .delete_review(ReviewUuid::from_uuid(review.into_inner()), user.uuid)
        .await
        .map_err(into_review_api_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use bookshelf_app::domain::books::{BooksServiceError, MockBooksService};

    use crate::test_helpers::{Mocks, TEST_CUSTOMER};

    use super::*;

    fn make_service(books: MockBooksService) -> Service {
        Mocks {
            books,
            ..Mocks::default()
        }
        .customer_service(Router::with_path("reviews/{review}").delete(handler))
    }

    #[tokio::test]
    async fn test_author_deletes_review() -> TestResult {
        let uuid = ReviewUuid::new();

        let mut books = MockBooksService::new();

        books
            .expect_delete_review()
            .once()
            .withf(move |review, author| *review == uuid && *author == TEST_CUSTOMER.uuid)
            .return_once(|_, _| Ok(()));

        let res = TestClient::delete(format!("http://example.com/reviews/{uuid}"))
            .send(&make_service(books))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_other_users_review_returns_404() -> TestResult {
        let mut books = MockBooksService::new();

        books
            .expect_delete_review()
            .once()
            .return_once(|_, _| Err(BooksServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/reviews/{}", Uuid::now_v7()))
            .send(&make_service(books))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
