//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use bookshelf_app::domain::books::records::BookUuid;

use crate::{
    carts::{errors::into_api_error, models::CartResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
///
/// Removing a book that is not in the cart still succeeds.
#[endpoint(tags("cart"), summary = "Remove Cart Item", security(("bearer_auth" = [])))]
#[tracing::instrument(name = "cart.remove_item", skip_all, fields(book_uuid = %*book), err)]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let cart = state
        .app
        .carts
        .remove_item(user.uuid, BookUuid::from_uuid(book.into_inner()))
        .await
        .map_err(into_api_error)?;

    Ok(Json(cart.into()))
}
