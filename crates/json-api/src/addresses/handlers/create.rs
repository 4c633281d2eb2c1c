//! Create Address Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bookshelf_app::domain::addresses::{data::NewAddress, records::AddressUuid};

use crate::{
    addresses::{errors::into_api_error, models::AddressResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Create Address Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateAddressRequest {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,

    /// Defaults to India
    pub country: Option<String>,
    pub pincode: String,
}

/// Create Address Handler
#[endpoint(
    tags("addresses"),
    summary = "Create Address",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Address created"),
    ),
)]
#[tracing::instrument(
    name = "addresses.create",
    skip_all,
    fields(address_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateAddressRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AddressResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;
    let request = json.into_inner();

    let uuid = AddressUuid::new();

    tracing::Span::current().record("address_uuid", tracing::field::display(uuid));

    let address = state
        .app
        .addresses
        .create_address(NewAddress {
            uuid,
            owner_uuid: user.uuid,
            address_line1: request.address_line1,
            address_line2: request.address_line2,
            city: request.city,
            state: request.state,
            country: request.country,
            pincode: request.pincode,
        })
        .await
        .map_err(into_api_error)?;

    res.add_header(LOCATION, format!("/addresses/{}", address.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(address.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bookshelf_app::{
        domain::addresses::{AddressesServiceError, MockAddressesService},
        validation::ValidationErrors,
    };

    use crate::{
        errors::ErrorResponse,
        test_helpers::{Mocks, TEST_CUSTOMER, make_address},
    };

    use super::*;

    fn make_service(addresses: MockAddressesService) -> Service {
        Mocks {
            addresses,
            ..Mocks::default()
        }
        .customer_service(Router::with_path("addresses").post(handler))
    }

    #[tokio::test]
    async fn test_create_address_for_caller() -> TestResult {
        let mut addresses = MockAddressesService::new();

        addresses
            .expect_create_address()
            .once()
            .withf(|address| {
                address.owner_uuid == TEST_CUSTOMER.uuid
                    && address.country.is_none()
                    && address.pincode == "400001"
            })
            .return_once(|address| Ok(make_address(address.uuid)));

        let mut res = TestClient::post("http://example.com/addresses")
            .json(&json!({
                "address_line1": "221B Baker Street",
                "city": "Mumbai",
                "state": "Maharashtra",
                "pincode": "400001",
            }))
            .send(&make_service(addresses))
            .await;

        let body: AddressResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(
            res.headers()
                .get(LOCATION)
                .and_then(|value| value.to_str().ok()),
            Some(format!("/addresses/{}", body.uuid).as_str())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_invalid_address_lists_every_message() -> TestResult {
        let mut addresses = MockAddressesService::new();

        addresses.expect_create_address().once().return_once(|_| {
            let mut errors = ValidationErrors::new();

            errors.push("City must be at least 2 characters");
            errors.push("Invalid pincode");

            Err(AddressesServiceError::Validation(errors))
        });

        let mut res = TestClient::post("http://example.com/addresses")
            .json(&json!({
                "address_line1": "221B Baker Street",
                "city": "M",
                "state": "Maharashtra",
                "pincode": "012345",
            }))
            .send(&make_service(addresses))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            body.messages,
            ["City must be at least 2 characters", "Invalid pincode"]
        );
        assert!(!body.success, "error envelope must not report success");

        Ok(())
    }
}
