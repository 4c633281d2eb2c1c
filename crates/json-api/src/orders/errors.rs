//! Errors

use tracing::{error, warn};

use bookshelf_app::domain::orders::OrdersServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: OrdersServiceError) -> ApiError {
    match error {
        OrdersServiceError::NotFound => ApiError::not_found("Order not found"),
        OrdersServiceError::AddressNotFound => ApiError::not_found("Address does not exists"),
        OrdersServiceError::AlreadyExists => ApiError::conflict("Order already exists"),
        OrdersServiceError::InvalidReference => {
            ApiError::bad_request("Order references a missing resource")
        }
        OrdersServiceError::InvalidState(message) => ApiError::bad_request(message),
        error @ OrdersServiceError::InvalidTransition { .. } => {
            ApiError::bad_request(error.to_string())
        }
        OrdersServiceError::InvalidSignature => {
            ApiError::bad_request("Payment signature is invalid")
        }
        OrdersServiceError::InvalidData => ApiError::bad_request("Invalid order data"),
        OrdersServiceError::Validation(errors) => ApiError::validation(errors),
        OrdersServiceError::Upstream(source) => {
            warn!("payment provider failure: {source}");

            ApiError::bad_gateway(source.to_string())
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage failure: {source}");

            ApiError::internal()
        }
    }
}
