//! Get Address Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use bookshelf_app::domain::addresses::records::AddressUuid;

use crate::{
    addresses::{errors::into_api_error, models::AddressResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Get Address Handler
#[endpoint(tags("addresses"), summary = "Get Address", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    address: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<AddressResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let address = state
        .app
        .addresses
        .get_address(AddressUuid::from_uuid(address.into_inner()), user.uuid)
        .await
        .map_err(into_api_error)?;

    Ok(Json(address.into()))
}
