//! Upsert Cart Item Handler

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

use bookshelf_app::domain::{books::records::BookUuid, carts::data::CartItemUpsert};

use crate::{
    carts::{errors::into_api_error, models::CartResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemRequest {
    /// Replaces any quantity already in the cart, 1 when omitted
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

const fn default_quantity() -> u32 {
    1
}

/// Upsert Cart Item Handler
///
/// Sets the quantity of a book in the cart, adding the line if needed.
#[endpoint(tags("cart"), summary = "Set Cart Item", security(("bearer_auth" = [])))]
#[tracing::instrument(name = "cart.upsert_item", skip_all, fields(book_uuid = %*book), err)]
pub(crate) async fn handler(
    book: PathParam<Uuid>,
    json: JsonBody<CartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let cart = state
        .app
        .carts
        .upsert_item(
            user.uuid,
            CartItemUpsert {
                book_uuid: BookUuid::from_uuid(book.into_inner()),
                quantity: json.into_inner().quantity,
            },
        )
        .await
        .map_err(into_api_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bookshelf_app::domain::carts::{
        CartsServiceError, MockCartsService,
        records::{CartAggregate, CartLine},
    };

    use crate::{
        errors::ErrorResponse,
        test_helpers::{Mocks, TEST_CUSTOMER, make_book},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        Mocks {
            carts,
            ..Mocks::default()
        }
        .customer_service(Router::with_path("cart/item/{book}").post(handler))
    }

    #[tokio::test]
    async fn test_upsert_returns_repriced_cart() -> TestResult {
        let book = BookUuid::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_upsert_item()
            .once()
            .withf(move |owner, item| {
                *owner == TEST_CUSTOMER.uuid
                    && *item
                        == CartItemUpsert {
                            book_uuid: book,
                            quantity: 2,
                        }
            })
            .return_once(move |_, item| {
                CartAggregate::from_lines(vec![CartLine {
                    book: make_book(book, 450, 5),
                    quantity: item.quantity,
                }])
            });

        let response: CartResponse =
            TestClient::post(format!("http://example.com/cart/item/{book}"))
                .json(&json!({ "quantity": 2 }))
                .send(&make_service(carts))
                .await
                .take_json()
                .await?;

        assert_eq!(response.cart_total, 900);
        assert_eq!(response.items.first().map(|line| line.quantity), Some(2));

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_quantity_defaults_to_one() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_upsert_item()
            .once()
            .withf(|_, item| item.quantity == 1)
            .return_once(|_, _| Ok(CartAggregate::default()));

        let res = TestClient::post(format!("http://example.com/cart/item/{}", Uuid::now_v7()))
            .json(&json!({}))
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_quantity_above_stock_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_upsert_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::insufficient_stock(2, 5)));

        let mut res = TestClient::post(format!("http://example.com/cart/item/{}", Uuid::now_v7()))
            .json(&json!({ "quantity": 5 }))
            .send(&make_service(carts))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            body.messages,
            ["Only 2 products are remaining. But you are adding 5"]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_book_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_upsert_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::NotFound));

        let mut res = TestClient::post(format!("http://example.com/cart/item/{}", Uuid::now_v7()))
            .json(&json!({ "quantity": 1 }))
            .send(&make_service(carts))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.messages, ["Book not found"]);

        Ok(())
    }
}
