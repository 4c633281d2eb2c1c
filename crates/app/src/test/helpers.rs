//! Test doubles and fixture builders.

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::{
    mail::{Email, MailError, Mailer},
    payments::{PaymentGateway, PaymentGatewayError, PaymentSession, signature},
    storage::ImageUpload,
};

/// Secret the fake gateway signs payments with.
pub(crate) const TEST_GATEWAY_SECRET: &str = "test_gateway_secret";

/// A small PNG upload named `name`.
pub(crate) fn image_upload(name: &str) -> ImageUpload {
    ImageUpload {
        file_name: name.to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
    }
}

/// Gateway that opens numbered sessions and checks real HMAC signatures.
#[derive(Debug, Default)]
pub(crate) struct FakeGateway {
    sessions: AtomicUsize,
}

impl FakeGateway {
    pub(crate) fn sessions(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_order(
        &self,
        amount: u64,
        currency: &str,
        receipt: &str,
    ) -> Result<PaymentSession, PaymentGatewayError> {
        let number = self.sessions.fetch_add(1, Ordering::SeqCst) + 1;

        Ok(PaymentSession {
            id: format!("order_test_{receipt}_{number}"),
            amount,
            currency: currency.to_string(),
            receipt: receipt.to_string(),
            status: "created".to_string(),
        })
    }

    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        signature::verify(TEST_GATEWAY_SECRET, order_id, payment_id, signature)
    }
}

/// Mailer that keeps every message it is asked to send.
#[derive(Debug, Default)]
pub(crate) struct RecordingMailer {
    sent: Mutex<Vec<Email>>,
}

impl RecordingMailer {
    pub(crate) fn sent(&self) -> Vec<Email> {
        self.sent.lock().map(|sent| sent.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email);
        }

        Ok(())
    }
}
