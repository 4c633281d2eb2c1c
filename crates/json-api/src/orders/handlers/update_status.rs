//! Update Order Status Handler

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

use bookshelf_app::domain::orders::records::{OrderStatus, OrderUuid};

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{errors::into_api_error, models::OrderDetailsResponse},
    state::State,
};

/// Update Order Status Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderStatusRequest {
    /// `shipped`, `delivered` or `cancelled`
    pub status: String,
}

/// Update Order Status Handler
#[endpoint(tags("orders"), summary = "Update Order Status", security(("bearer_auth" = [])))]
#[tracing::instrument(
    name = "orders.update_status",
    skip_all,
    fields(order_uuid = %*order, status = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    json: JsonBody<UpdateOrderStatusRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderDetailsResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let status = json
        .into_inner()
        .status
        .parse::<OrderStatus>()
        .map_err(|error| ApiError::bad_request(error.to_string()))?;

    tracing::Span::current().record("status", status.as_str());

    let order = state
        .app
        .orders
        .update_status(OrderUuid::from_uuid(order.into_inner()), status)
        .await
        .map_err(into_api_error)?;

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bookshelf_app::domain::orders::{MockOrdersService, OrdersServiceError};

    use crate::{
        errors::ErrorResponse,
        test_helpers::{Mocks, make_order_details},
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        Mocks {
            orders,
            ..Mocks::default()
        }
        .admin_service(Router::with_path("orders/{order}/status").patch(handler))
    }

    #[tokio::test]
    async fn test_ship_paid_order() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_update_status()
            .once()
            .withf(move |order, status| *order == uuid && *status == OrderStatus::Shipped)
            .return_once(move |_, status| Ok(make_order_details(uuid, status)));

        let response: OrderDetailsResponse =
            TestClient::patch(format!("http://example.com/orders/{uuid}/status"))
                .json(&json!({ "status": "shipped" }))
                .send(&make_service(orders))
                .await
                .take_json()
                .await?;

        assert_eq!(response.order.status, "shipped");

        Ok(())
    }

    #[tokio::test]
    async fn test_disallowed_transition_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_update_status().once().return_once(|_, _| {
            Err(OrdersServiceError::InvalidTransition {
                from: OrderStatus::Pending,
                to: OrderStatus::Shipped,
            })
        });

        let mut res = TestClient::patch(format!(
            "http://example.com/orders/{}/status",
            Uuid::now_v7()
        ))
        .json(&json!({ "status": "shipped" }))
        .send(&make_service(orders))
        .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.messages, ["cannot move order from pending to shipped"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_status_never_reaches_service() -> TestResult {
        let res = TestClient::patch(format!(
            "http://example.com/orders/{}/status",
            Uuid::now_v7()
        ))
        .json(&json!({ "status": "teleported" }))
        .send(&make_service(MockOrdersService::new()))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
