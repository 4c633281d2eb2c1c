//! Transactional mail over an HTTP API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::mail::{Email, MailError, Mailer};

#[derive(Clone)]
pub struct HttpMailerConfig {
    /// Endpoint accepting a JSON message.
    pub api_url: String,
    pub api_token: String,

    /// Sender address.
    pub from: String,
}

impl std::fmt::Debug for HttpMailerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpMailerConfig")
            .field("api_url", &self.api_url)
            .field("api_token", &"**redacted**")
            .field("from", &self.from)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct HttpMailer {
    config: HttpMailerConfig,
    http: Client,
}

impl HttpMailer {
    #[must_use]
    pub fn new(config: HttpMailerConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct OutgoingMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text: &'a str,
    html: &'a str,
}

#[async_trait]
impl Mailer for HttpMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        let response = self
            .http
            .post(&self.config.api_url)
            .bearer_auth(&self.config.api_token)
            .json(&OutgoingMessage {
                from: &self.config.from,
                to: &email.to,
                subject: &email.subject,
                text: &email.text,
                html: &email.html,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(MailError::Rejected {
                status: response.status().as_u16(),
            });
        }

        Ok(())
    }
}
