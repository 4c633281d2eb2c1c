//! Address Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    addresses::{errors::into_api_error, models::AddressResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressesResponse {
    pub addresses: Vec<AddressResponse>,
    pub pagination: PaginationResponse,
}

/// Address Index Handler
///
/// Lists the caller's own addresses.
#[endpoint(tags("addresses"), summary = "List Addresses", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<AddressesResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let addresses = state
        .app
        .addresses
        .list_addresses(user.uuid, page_request(page, limit))
        .await
        .map_err(into_api_error)?;

    let pagination = PaginationResponse::from(&addresses);

    Ok(Json(AddressesResponse {
        addresses: addresses.data.into_iter().map(Into::into).collect(),
        pagination,
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bookshelf_app::{
        domain::addresses::{MockAddressesService, records::AddressUuid},
        pagination::{Page, PageRequest},
    };

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, make_address};

    use super::*;

    #[tokio::test]
    async fn test_lists_callers_addresses() -> TestResult {
        let mut addresses = MockAddressesService::new();

        addresses
            .expect_list_addresses()
            .once()
            .withf(|owner, page| {
                *owner == TEST_CUSTOMER.uuid && *page == PageRequest::new(Some(2), Some(5))
            })
            .return_once(|_, page| {
                Ok(Page::new(page, 6, vec![make_address(AddressUuid::new())]))
            });

        let service = Mocks {
            addresses,
            ..Mocks::default()
        }
        .customer_service(Router::with_path("addresses").get(handler));

        let response: AddressesResponse =
            TestClient::get("http://example.com/addresses?page=2&limit=5")
                .send(&service)
                .await
                .take_json()
                .await?;

        assert_eq!(response.addresses.len(), 1);
        assert_eq!(response.pagination.total_items, 6);
        assert_eq!(response.pagination.total_pages, 2);

        Ok(())
    }
}
