//! Errors

use tracing::error;

use bookshelf_app::domain::categories::CategoriesServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: CategoriesServiceError) -> ApiError {
    match error {
        CategoriesServiceError::AlreadyExists => ApiError::conflict("Category already exists"),
        CategoriesServiceError::NotFound => ApiError::not_found("Category not found"),
        CategoriesServiceError::InUse => ApiError::conflict("Category still has books"),
        CategoriesServiceError::Validation(errors) => ApiError::validation(errors),
        CategoriesServiceError::InvalidReference | CategoriesServiceError::InvalidData => {
            ApiError::bad_request("Invalid category payload")
        }
        CategoriesServiceError::Sql(source) => {
            error!("category storage failure: {source}");

            ApiError::internal()
        }
    }
}
