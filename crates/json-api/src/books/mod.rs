//! Books

mod errors;
mod form;
mod handlers;
mod models;

pub(crate) use errors::into_review_api_error;
pub(crate) use handlers::*;
pub(crate) use models::BookResponse;
