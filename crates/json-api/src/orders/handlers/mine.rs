//! Customer Order Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{errors::into_api_error, handlers::index::OrdersResponse},
    state::State,
};

/// Customer Order Index Handler
///
/// The caller's own orders, newest first.
#[endpoint(tags("orders"), summary = "List My Orders", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;

    let orders = state
        .app
        .orders
        .list_customer_orders(user.uuid, page_request(page, limit))
        .await
        .map_err(into_api_error)?;

    let pagination = PaginationResponse::from(&orders);

    Ok(Json(OrdersResponse {
        orders: orders.data.into_iter().map(Into::into).collect(),
        pagination,
    }))
}
