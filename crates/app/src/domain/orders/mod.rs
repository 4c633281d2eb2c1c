//! Orders, checkout and payment fulfillment

pub mod data;
pub mod errors;
pub mod records;
mod repository;
pub mod service;
pub mod status;

pub use errors::OrdersServiceError;
pub use service::*;
