//! Create Book Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, prelude::*};

use bookshelf_app::domain::books::records::BookUuid;

use crate::{
    books::{errors::into_api_error, form::BookForm, models::BookResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Create Book Handler
///
/// Accepts `multipart/form-data` with `title`, `author`, `description`,
/// `price`, `stock`, `category_uuid`, one `main_image` and up to four
/// `sub_images`.
#[endpoint(
    tags("books"),
    summary = "Create Book",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Book created"),
    ),
)]
#[tracing::instrument(
    name = "books.create",
    skip_all,
    fields(book_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<BookResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let admin = depot.user_or_401()?;

    let uuid = BookUuid::new();

    tracing::Span::current().record("book_uuid", tracing::field::display(uuid));

    let book = BookForm::read(req).await?.into_new_book(uuid, admin.uuid)?;

    let book = state
        .app
        .books
        .create_book(book)
        .await
        .map_err(into_api_error)?;

    res.add_header(LOCATION, format!("/books/{}", book.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(book.into()))
}
