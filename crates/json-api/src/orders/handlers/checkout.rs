//! Razorpay Checkout Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::{addresses::records::AddressUuid, orders::data::Checkout};

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{errors::into_api_error, models::CheckoutResponse},
    state::State,
};

/// Checkout Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutRequest {
    /// One of the caller's saved addresses
    pub address_uuid: Uuid,
}

/// Razorpay Checkout Handler
///
/// Opens a Razorpay order for the caller's cart and records a pending order.
#[endpoint(
    tags("orders"),
    summary = "Checkout With Razorpay",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Payment session opened"),
    ),
)]
#[tracing::instrument(
    name = "orders.checkout",
    skip_all,
    fields(address_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CheckoutRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CheckoutResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;
    let request = json.into_inner();

    tracing::Span::current().record(
        "address_uuid",
        tracing::field::display(request.address_uuid),
    );

    let checkout = state
        .app
        .orders
        .checkout(
            user.uuid,
            Checkout {
                address_uuid: AddressUuid::from_uuid(request.address_uuid),
            },
        )
        .await
        .map_err(into_api_error)?;

    res.status_code(StatusCode::CREATED);

    Ok(Json(checkout.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bookshelf_app::{
        domain::orders::{
            MockOrdersService, OrdersServiceError,
            records::{CheckoutSession, OrderStatus, OrderUuid},
        },
        payments::{PaymentGatewayError, PaymentSession},
    };

    use crate::{
        errors::ErrorResponse,
        test_helpers::{Mocks, TEST_CUSTOMER, make_order_details},
    };

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        Mocks {
            orders,
            ..Mocks::default()
        }
        .customer_service(Router::with_path("orders/provider/razorpay").post(handler))
    }

    #[tokio::test]
    async fn test_checkout_returns_session_and_pending_order() -> TestResult {
        let address = AddressUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_checkout()
            .once()
            .withf(move |customer, checkout| {
                *customer == TEST_CUSTOMER.uuid && checkout.address_uuid == address
            })
            .return_once(|_, _| {
                Ok(CheckoutSession {
                    session: PaymentSession {
                        id: "order_test_123".to_string(),
                        amount: 1_000,
                        currency: "INR".to_string(),
                        receipt: "rcpt000001".to_string(),
                        status: "created".to_string(),
                    },
                    order: make_order_details(OrderUuid::new(), OrderStatus::Pending),
                })
            });

        let mut res = TestClient::post("http://example.com/orders/provider/razorpay")
            .json(&json!({ "address_uuid": address.into_uuid() }))
            .send(&make_service(orders))
            .await;

        let body: CheckoutResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body.session.id, "order_test_123");
        assert_eq!(body.session.amount, body.order.order.order_price);
        assert_eq!(body.order.order.status, "pending");
        assert!(!body.order.order.is_payment_done, "new order is unpaid");

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_address_returns_404() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_checkout()
            .once()
            .return_once(|_, _| Err(OrdersServiceError::AddressNotFound));

        let mut res = TestClient::post("http://example.com/orders/provider/razorpay")
            .json(&json!({ "address_uuid": Uuid::now_v7() }))
            .send(&make_service(orders))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.messages, ["Address does not exists"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_cart_returns_400() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_checkout().once().return_once(|_, _| {
            Err(OrdersServiceError::InvalidState("User cart is empty".to_string()))
        });

        let mut res = TestClient::post("http://example.com/orders/provider/razorpay")
            .json(&json!({ "address_uuid": Uuid::now_v7() }))
            .send(&make_service(orders))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body.messages, ["User cart is empty"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_provider_failure_returns_502() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_checkout().once().return_once(|_, _| {
            Err(OrdersServiceError::Upstream(PaymentGatewayError::Rejected(
                "Authentication failed".to_string(),
            )))
        });

        let res = TestClient::post("http://example.com/orders/provider/razorpay")
            .json(&json!({ "address_uuid": Uuid::now_v7() }))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_GATEWAY));

        Ok(())
    }
}
