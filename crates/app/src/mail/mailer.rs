//! Mailer abstraction.

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;

use crate::mail::MailError;

/// A rendered message ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub text: String,
    pub html: String,
}

#[automock]
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), MailError>;
}
