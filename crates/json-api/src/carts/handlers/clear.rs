//! Clear Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_api_error, models::CartResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Clear Cart Handler
#[endpoint(tags("cart"), summary = "Clear Cart", security(("bearer_auth" = [])))]
#[tracing::instrument(name = "cart.clear", skip_all, err)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let cart = state
        .app
        .carts
        .clear_cart(user.uuid)
        .await
        .map_err(into_api_error)?;

    Ok(Json(cart.into()))
}
