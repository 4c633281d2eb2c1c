//! Errors

use tracing::error;

use bookshelf_app::domain::books::BooksServiceError;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: BooksServiceError) -> ApiError {
    match error {
        BooksServiceError::NotFound => ApiError::not_found("Book not found"),
        BooksServiceError::AlreadyExists => ApiError::conflict("Book already exists"),
        BooksServiceError::InUse => ApiError::conflict("Book is referenced by orders"),
        BooksServiceError::InvalidReference => ApiError::bad_request("Category does not exist"),
        BooksServiceError::InvalidData => ApiError::bad_request("Invalid book payload"),
        BooksServiceError::Validation(errors) => ApiError::validation(errors),
        BooksServiceError::Storage(source) => {
            error!("book image storage failure: {source}");

            ApiError::internal()
        }
        BooksServiceError::Sql(source) => {
            error!("book storage failure: {source}");

            ApiError::internal()
        }
    }
}

pub(crate) fn into_review_api_error(error: BooksServiceError) -> ApiError {
    match error {
        BooksServiceError::NotFound => ApiError::not_found("Review not found"),
        BooksServiceError::AlreadyExists => {
            ApiError::conflict("You have already reviewed this book")
        }
        BooksServiceError::InvalidReference => ApiError::not_found("Book not found"),
        other => into_api_error(other),
    }
}
