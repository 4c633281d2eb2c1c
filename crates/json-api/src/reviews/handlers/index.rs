//! Review Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::books::{BooksServiceError, records::BookUuid};

use crate::{
    books::into_review_api_error,
    errors::ApiError,
    extensions::*,
    reviews::models::ReviewResponse,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewsResponse {
    pub reviews: Vec<ReviewResponse>,
    pub pagination: PaginationResponse,
}

/// Review Index Handler
#[endpoint(tags("reviews"), summary = "List Book Reviews")]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<ReviewsResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let reviews = state
        .app
        .books
        .list_reviews(
            BookUuid::from_uuid(book.into_inner()),
            page_request(page, limit),
        )
        .await
        .map_err(|error| match error {
            BooksServiceError::NotFound => ApiError::not_found("Book not found"),
            other => into_review_api_error(other),
        })?;

    let pagination = PaginationResponse::from(&reviews);

    Ok(Json(ReviewsResponse {
        reviews: reviews.data.into_iter().map(Into::into).collect(),
        pagination,
    }))
}
