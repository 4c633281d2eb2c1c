//! Update Book Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use bookshelf_app::domain::books::records::BookUuid;

use crate::{
    books::{errors::into_api_error, form::BookForm, models::BookResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Update Book Handler
///
/// Every field is optional. Sent images replace the stored ones.
#[endpoint(tags("books"), summary = "Update Book", security(("bearer_auth" = [])))]
#[tracing::instrument(
    name = "books.update",
    skip_all,
    fields(book_uuid = %*book),
    err
)]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<BookResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let update = BookForm::read(req).await?.into_update();

    let book = state
        .app
        .books
        .update_book(BookUuid::from_uuid(book.into_inner()), update)
        .await
        .map_err(into_api_error)?;

    Ok(Json(book.into()))
}
