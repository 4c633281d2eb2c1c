//! Order Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bookshelf_app::domain::orders::{data::OrderFilter, records::OrderStatus};

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{errors::into_api_error, models::OrderResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    pub orders: Vec<OrderResponse>,
    pub pagination: PaginationResponse,
}

/// Order Index Handler
///
/// Every order, newest first, optionally filtered by `status`.
#[endpoint(tags("orders"), summary = "List Orders", security(("bearer_auth" = [])))]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    page: QueryParam<u32, false>,
    limit: QueryParam<u32, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let status = status
        .into_inner()
        .map(|status| status.parse::<OrderStatus>())
        .transpose()
        .map_err(|error| ApiError::bad_request(error.to_string()))?;

    let orders = state
        .app
        .orders
        .list_orders(OrderFilter { status }, page_request(page, limit))
        .await
        .map_err(into_api_error)?;

    let pagination = PaginationResponse::from(&orders);

    Ok(Json(OrdersResponse {
        orders: orders.data.into_iter().map(Into::into).collect(),
        pagination,
    }))
}
