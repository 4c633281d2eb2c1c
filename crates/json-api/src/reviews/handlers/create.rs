//! Create Review Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::books::{
    BooksServiceError,
    data::NewReview,
    records::{BookUuid, ReviewUuid},
};

use crate::{
    books::into_review_api_error,
    errors::ApiError,
    extensions::*,
    reviews::models::ReviewResponse,
    state::State,
};

/// Create Review Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateReviewRequest {
    /// 1 to 5
    pub rating: u8,
    pub comment: String,
}

/// Create Review Handler
///
/// Each user may review a book once.
#[endpoint(
    tags("reviews"),
    summary = "Review Book",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Review added"),
    ),
)]
#[tracing::instrument(name = "reviews.create", skip_all, fields(book_uuid = %*book), err)]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    json: JsonBody<CreateReviewRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ReviewResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;
    let request = json.into_inner();

    let review = state
        .app
        .books
        .add_review(NewReview {
            uuid: ReviewUuid::new(),
            book_uuid: BookUuid::from_uuid(book.into_inner()),
            author_uuid: user.uuid,
            rating: request.rating,
            comment: request.comment,
        })
        .await
        .map_err(|error| match error {
            BooksServiceError::NotFound => ApiError::not_found("Book not found"),
            other => into_review_api_error(other),
        })?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(review.into()))
}
