//! Payment gateway errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentGatewayError {
    /// Transport or body decoding failure.
    #[error("payment provider request failed")]
    Http(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("payment provider rejected the request: {0}")]
    Rejected(String),
}
