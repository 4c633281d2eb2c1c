//! Errors

use tracing::error;

use bookshelf_app::domain::addresses::AddressesServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: AddressesServiceError) -> ApiError {
    match error {
        AddressesServiceError::NotFound => ApiError::not_found("Address not found"),
        AddressesServiceError::AlreadyExists => ApiError::conflict("Address already exists"),
        AddressesServiceError::InvalidReference => {
            ApiError::conflict("Address is referenced by another resource")
        }
        AddressesServiceError::InvalidData => ApiError::bad_request("Invalid address payload"),
        AddressesServiceError::Validation(errors) => ApiError::validation(errors),
        AddressesServiceError::Sql(source) => {
            error!("address storage failure: {source}");

            ApiError::internal()
        }
    }
}
