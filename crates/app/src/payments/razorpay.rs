//! Razorpay orders API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::payments::{PaymentGateway, PaymentGatewayError, PaymentSession, signature};

const DEFAULT_REJECTION: &str = "payment provider rejected the order";

/// Razorpay credentials and endpoint.
#[derive(Clone)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,

    /// API root, e.g. `"https://api.razorpay.com"`.
    pub base_url: String,
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"**redacted**")
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct RazorpayClient {
    config: RazorpayConfig,
    http: Client,
}

impl RazorpayClient {
    #[must_use]
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn orders_url(&self) -> String {
        format!("{}/v1/orders", self.config.base_url.trim_end_matches('/'))
    }
}

#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: u64,
    currency: &'a str,
    receipt: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    reason: Option<String>,
    description: Option<String>,
}

/// Pick the most specific message out of an error response body.
fn rejection_reason(body: &str) -> String {
    serde_json::from_str::<ErrorResponse>(body)
        .ok()
        .and_then(|response| response.error)
        .and_then(|error| {
            error
                .reason
                .filter(|reason| !reason.trim().is_empty())
                .or(error.description)
        })
        .filter(|reason| !reason.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_REJECTION.to_string())
}

#[async_trait]
impl PaymentGateway for RazorpayClient {
    async fn create_order(
        &self,
        amount: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentSession, PaymentGatewayError> {
        let response = self
            .http
            .post(self.orders_url())
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&CreateOrderRequest {
                amount,
                currency,
                receipt,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();

            debug!(%status, body, "payment provider rejected order");

            return Err(PaymentGatewayError::Rejected(rejection_reason(&body)));
        }

        Ok(response.json::<PaymentSession>().await?)
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        signature::verify(&self.config.key_secret, order_id, payment_id, signature)
    }
}
