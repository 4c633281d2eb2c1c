//! Orders service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::{
    domain::{carts::CartsServiceError, orders::records::OrderStatus},
    payments::PaymentGatewayError,
    validation::ValidationErrors,
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("Address does not exists")]
    AddressNotFound,

    #[error("related resource not found")]
    InvalidReference,

    /// The order or cart is not in a state that allows the operation.
    #[error("{0}")]
    InvalidState(String),

    #[error("cannot move order from {from} to {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },

    #[error("payment signature is invalid")]
    InvalidSignature,

    #[error("invalid data")]
    InvalidData,

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Upstream(#[from] PaymentGatewayError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for OrdersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation | ErrorKind::CheckViolation) => Self::InvalidData,
            Some(_) | None => Self::Sql(error),
        }
    }
}

impl From<CartsServiceError> for OrdersServiceError {
    fn from(error: CartsServiceError) -> Self {
        match error {
            CartsServiceError::Sql(error) => Self::Sql(error),
            CartsServiceError::Validation(errors) => Self::Validation(errors),
            CartsServiceError::NotFound => Self::NotFound,
            CartsServiceError::InvalidQuantity(message) => Self::InvalidState(message),
            CartsServiceError::AlreadyExists => Self::AlreadyExists,
            CartsServiceError::InvalidReference => Self::InvalidReference,
            CartsServiceError::InvalidData => Self::InvalidData,
        }
    }
}
