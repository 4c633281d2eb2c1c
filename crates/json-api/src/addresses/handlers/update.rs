//! Update Address Handler

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

use bookshelf_app::domain::addresses::{data::AddressUpdate, records::AddressUuid};

use crate::{
    addresses::{errors::into_api_error, models::AddressResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Update Address Request. Absent fields are left unchanged.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateAddressRequest {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
}

impl From<UpdateAddressRequest> for AddressUpdate {
    fn from(request: UpdateAddressRequest) -> Self {
        Self {
            address_line1: request.address_line1,
            address_line2: request.address_line2,
            city: request.city,
            state: request.state,
            country: request.country,
            pincode: request.pincode,
        }
    }
}

/// Update Address Handler
#[endpoint(tags("addresses"), summary = "Update Address", security(("bearer_auth" = [])))]
#[tracing::instrument(name = "addresses.update", skip_all, fields(address_uuid = %*address), err)]
pub(crate) async fn handler(
    address: PathParam<Uuid>,
    json: JsonBody<UpdateAddressRequest>,
    depot: &mut Depot,
) -> Result<Json<AddressResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let address = state
        .app
        .addresses
        .update_address(
            AddressUuid::from_uuid(address.into_inner()),
            user.uuid,
            json.into_inner().into(),
        )
        .await
        .map_err(into_api_error)?;

    Ok(Json(address.into()))
}
