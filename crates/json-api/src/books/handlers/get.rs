//! Get Book Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use bookshelf_app::domain::books::records::BookUuid;

use crate::{
    books::{errors::into_api_error, models::BookResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Get Book Handler
#[endpoint(tags("books"), summary = "Get Book")]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<BookResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let book = state
        .app
        .books
        .get_book(BookUuid::from_uuid(book.into_inner()))
        .await
        .map_err(into_api_error)?;

    Ok(Json(book.into()))
}
