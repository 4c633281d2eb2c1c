//! Books and their reviews

pub mod data;
pub mod errors;
pub mod records;
mod repositories;
pub mod service;

pub use errors::BooksServiceError;
pub use service::*;
