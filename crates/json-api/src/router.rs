//! App Router

use std::path::PathBuf;

use salvo::{Router, serve_static::StaticDir};

use crate::{
    addresses, auth, books, carts, categories, healthcheck, observability::metrics_handler,
    orders, reviews,
};

/// Every route of the JSON API. State injection and request middleware are
/// added by the caller.
pub(crate) fn app_router(image_dir: PathBuf) -> Router {
    Router::new()
        .push(public_router(image_dir))
        .push(
            Router::new()
                .hoop(auth::middleware::handler)
                .push(customer_router())
                .push(
                    Router::new()
                        .hoop(auth::admin::require_admin)
                        .push(admin_router()),
                ),
        )
}

fn public_router(image_dir: PathBuf) -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(Router::with_path("images/{**path}").get(StaticDir::new([image_dir])))
        .push(
            Router::with_path("categories")
                .get(categories::index::handler)
                .push(Router::with_path("{category}").get(categories::get::handler)),
        )
        .push(
            Router::with_path("books")
                .get(books::index::handler)
                .push(
                    Router::with_path("{book}")
                        .get(books::get::handler)
                        .push(Router::with_path("reviews").get(reviews::index::handler)),
                ),
        )
}

fn customer_router() -> Router {
    Router::new()
        .push(Router::with_path("books/{book}/reviews").post(reviews::create::handler))
        .push(Router::with_path("reviews/{review}").delete(reviews::delete::handler))
        .push(
            Router::with_path("addresses")
                .get(addresses::index::handler)
                .post(addresses::create::handler)
                .push(
                    Router::with_path("{address}")
                        .get(addresses::get::handler)
                        .patch(addresses::update::handler)
                        .delete(addresses::delete::handler),
                ),
        )
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .push(Router::with_path("clear").delete(carts::clear::handler))
                .push(
                    Router::with_path("item/{book}")
                        .post(carts::upsert_item::handler)
                        .delete(carts::remove_item::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .push(
                    Router::with_path("provider/razorpay")
                        .post(orders::checkout::handler)
                        .push(
                            Router::with_path("verify-payment")
                                .post(orders::verify_payment::handler),
                        ),
                )
                .push(Router::with_path("mine").get(orders::mine::handler))
                .push(Router::with_path("{order}").get(orders::get::handler)),
        )
}

fn admin_router() -> Router {
    Router::new()
        .push(
            Router::with_path("categories")
                .post(categories::create::handler)
                .push(
                    Router::with_path("{category}")
                        .patch(categories::update::handler)
                        .delete(categories::delete::handler),
                ),
        )
        .push(
            Router::with_path("books")
                .post(books::create::handler)
                .push(
                    Router::with_path("{book}")
                        .patch(books::update::handler)
                        .delete(books::delete::handler),
                ),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .push(Router::with_path("{order}/status").patch(orders::update_status::handler)),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        http::header::AUTHORIZATION,
        prelude::*,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;
    use uuid::Uuid;

    use bookshelf_app::{
        auth::MockAuthService,
        domain::{
            categories::{MockCategoriesService, records::CategoryUuid},
            orders::MockOrdersService,
        },
        pagination::Page,
    };

    use crate::{
        errors::ErrorResponse,
        test_helpers::{Mocks, TEST_CUSTOMER, make_category},
    };

    use super::*;

    const CUSTOMER_TOKEN: &str = "bs_v1_customer";

    fn customer_auth() -> MockAuthService {
        let mut auth = MockAuthService::new();

        auth.expect_authenticate_bearer()
            .withf(|token| token == CUSTOMER_TOKEN)
            .returning(|_| Ok(TEST_CUSTOMER));

        auth
    }

    fn make_service(mocks: Mocks) -> Service {
        Service::new(
            Router::new()
                .hoop(inject(mocks.into_state()))
                .push(app_router(std::env::temp_dir())),
        )
    }

    #[tokio::test]
    async fn test_public_routes_need_no_token() -> TestResult {
        let mut categories = MockCategoriesService::new();

        categories
            .expect_list_categories()
            .once()
            .return_once(|| Ok(Vec::new()));

        let service = make_service(Mocks {
            categories,
            ..Mocks::default()
        });

        let res = TestClient::get("http://example.com/categories")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let res = TestClient::get("http://example.com/healthcheck")
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_single_category_is_public() -> TestResult {
        let uuid = CategoryUuid::new();

        let mut categories = MockCategoriesService::new();

        categories
            .expect_get_category()
            .once()
            .return_once(move |_| Ok(make_category(uuid, "Fiction")));

        let service = make_service(Mocks {
            categories,
            ..Mocks::default()
        });

        let res = TestClient::get(format!("http://example.com/categories/{uuid}"))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_customer_routes_require_a_token() -> TestResult {
        let service = make_service(Mocks::default());

        for path in ["cart", "addresses", "orders/mine"] {
            let mut res = TestClient::get(format!("http://example.com/{path}"))
                .send(&service)
                .await;

            let body: ErrorResponse = res.take_json().await?;

            assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED), "GET /{path}");
            assert_eq!(body.messages, ["Missing or invalid Authorization header"]);
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_routes_forbid_customers() -> TestResult {
        let service = make_service(Mocks {
            auth: customer_auth(),
            ..Mocks::default()
        });

        let res = TestClient::get("http://example.com/orders")
            .add_header(AUTHORIZATION, format!("Bearer {CUSTOMER_TOKEN}"), true)
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        let mut res = TestClient::post("http://example.com/categories")
            .add_header(AUTHORIZATION, format!("Bearer {CUSTOMER_TOKEN}"), true)
            .json(&serde_json::json!({ "name": "Poetry" }))
            .send(&service)
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        assert_eq!(body.messages, ["Admin access required"]);

        let res = TestClient::delete(format!("http://example.com/categories/{}", Uuid::now_v7()))
            .add_header(AUTHORIZATION, format!("Bearer {CUSTOMER_TOKEN}"), true)
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_mine_is_not_captured_as_order_id() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_customer_orders()
            .once()
            .return_once(|_, page| Ok(Page::new(page, 0, Vec::new())));

        let service = make_service(Mocks {
            auth: customer_auth(),
            orders,
            ..Mocks::default()
        });

        let res = TestClient::get("http://example.com/orders/mine")
            .add_header(AUTHORIZATION, format!("Bearer {CUSTOMER_TOKEN}"), true)
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
