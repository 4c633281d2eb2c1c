//! Mailer that only logs messages.

use async_trait::async_trait;
use tracing::info;

use crate::mail::{Email, MailError, Mailer};

/// Used when no mail API is configured.
#[derive(Debug, Clone, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        info!(to = %email.to, subject = %email.subject, "mail delivery disabled; message logged");

        Ok(())
    }
}
