//! Errors

use tracing::error;

use bookshelf_app::domain::carts::CartsServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: CartsServiceError) -> ApiError {
    match error {
        CartsServiceError::NotFound | CartsServiceError::InvalidReference => {
            ApiError::not_found("Book not found")
        }
        CartsServiceError::AlreadyExists => ApiError::conflict("Cart already exists"),
        CartsServiceError::InvalidQuantity(message) => ApiError::bad_request(message),
        CartsServiceError::InvalidData => ApiError::bad_request("Invalid cart item"),
        CartsServiceError::Validation(errors) => ApiError::validation(errors),
        CartsServiceError::Sql(source) => {
            error!("cart storage failure: {source}");

            ApiError::internal()
        }
    }
}
