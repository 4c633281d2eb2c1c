//! Payment gateway abstraction.

use async_trait::async_trait;
use mockall::automock;
use serde::{Deserialize, Serialize};

use crate::payments::PaymentGatewayError;

/// A payment session opened with the provider for one checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
    pub status: String,
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Open a payment session for `amount` minor units.
    async fn create_order(
        &self,
        amount: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentSession, PaymentGatewayError>;

    /// Check the provider's signature over a completed payment.
    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}
