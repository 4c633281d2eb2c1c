//! Delete Book Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use bookshelf_app::domain::books::records::BookUuid;

use crate::{books::errors::into_api_error, errors::ApiError, extensions::*, state::State};

/// Delete Book Handler
#[endpoint(
    tags("books"),
    summary = "Delete Book",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Book deleted"),
    ),
)]
#[tracing::instrument(name = "books.delete", skip_all, fields(book_uuid = %*book), err)]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .books
        .delete_book(BookUuid::from_uuid(book.into_inner()))
        .await
        .map_err(into_api_error)?;

    Ok(StatusCode::NO_CONTENT)
}
