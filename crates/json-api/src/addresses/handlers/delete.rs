//! Delete Address Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use bookshelf_app::domain::addresses::records::AddressUuid;

use crate::{addresses::errors::into_api_error, errors::ApiError, extensions::*, state::State};

/// Delete Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Delete Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Address deleted"),
    ),
)]
#[tracing::instrument(name = "addresses.delete", skip_all, fields(address_uuid = %*address), err)]
pub(crate) async fn handler(
    address: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    state
        .app
        .addresses
        .delete_address(AddressUuid::from_uuid(address.into_inner()), user.uuid)
        .await
        .map_err(into_api_error)?;

    Ok(StatusCode::NO_CONTENT)
}
