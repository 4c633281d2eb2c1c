//! Get Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use bookshelf_app::domain::orders::records::OrderUuid;

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{errors::into_api_error, models::OrderDetailsResponse},
    state::State,
};

/// Get Order Handler
///
/// Admins can read any order; customers only their own.
#[endpoint(tags("orders"), summary = "Get Order", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderDetailsResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let customer = (!user.is_admin()).then_some(user.uuid);

    let order = state
        .app
        .orders
        .get_order(OrderUuid::from_uuid(order.into_inner()), customer)
        .await
        .map_err(into_api_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use bookshelf_app::domain::orders::{
        MockOrdersService, OrdersServiceError, records::OrderStatus,
    };

    use crate::test_helpers::{Mocks, TEST_CUSTOMER, make_order_details};

    use super::*;

    const ROUTE: &str = "orders/{order}";

    #[tokio::test]
    async fn test_customer_reads_own_order() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |order, customer| *order == uuid && *customer == Some(TEST_CUSTOMER.uuid))
            .return_once(move |_, _| Ok(make_order_details(uuid, OrderStatus::Paid)));

        let service = Mocks {
            orders,
            ..Mocks::default()
        }
        .customer_service(Router::with_path(ROUTE).get(handler));

        let response: OrderDetailsResponse =
            TestClient::get(format!("http://example.com/orders/{uuid}"))
                .send(&service)
                .await
                .take_json()
                .await?;

        assert_eq!(response.order.uuid, uuid.into_uuid());
        assert_eq!(response.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_reads_any_order() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .withf(move |order, customer| *order == uuid && customer.is_none())
            .return_once(move |_, _| Ok(make_order_details(uuid, OrderStatus::Shipped)));

        let service = Mocks {
            orders,
            ..Mocks::default()
        }
        .admin_service(Router::with_path(ROUTE).get(handler));

        let res = TestClient::get(format!("http://example.com/orders/{uuid}"))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_foreign_order_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_get_order()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::NotFound));

        let service = Mocks {
            orders,
            ..Mocks::default()
        }
        .customer_service(Router::with_path(ROUTE).get(handler));

        let res = TestClient::get(format!("http://example.com/orders/{}", Uuid::now_v7()))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
