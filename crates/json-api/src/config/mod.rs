//! Server configuration module

use std::path::PathBuf;

use clap::Parser;

use bookshelf_app::{
    context::{AppConfig, ImageStorageConfig},
    domain::orders::OrderSettings,
    mail::HttpMailerConfig,
    payments::RazorpayConfig,
};

use crate::config::{
    auth::AuthConfig,
    db::DatabaseConfig,
    logging::LoggingConfig,
    mail::MailConfig,
    payments::PaymentsConfig,
    server::ServerRuntimeConfig,
    storage::StorageConfig,
    telemetry::TelemetryConfig,
};

pub(crate) mod auth;
pub(crate) mod db;
pub(crate) mod logging;
pub(crate) mod mail;
pub(crate) mod payments;
pub(crate) mod server;
pub(crate) mod storage;
pub(crate) mod telemetry;

/// Bookshelf JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "bookshelf-json", about = "Bookshelf JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// OpenTelemetry trace export settings.
    #[command(flatten)]
    pub telemetry: TelemetryConfig,

    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// API token settings.
    #[command(flatten)]
    pub auth: AuthConfig,

    /// Payment provider settings.
    #[command(flatten)]
    pub payments: PaymentsConfig,

    /// Outgoing mail settings.
    #[command(flatten)]
    pub mail: MailConfig,

    /// Uploaded image settings.
    #[command(flatten)]
    pub storage: StorageConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }

    /// Directory served under `/images`.
    #[must_use]
    pub fn image_dir(&self) -> PathBuf {
        self.storage.image_dir.clone()
    }

    /// Settings consumed by the application context.
    #[must_use]
    pub fn to_app_config(&self) -> AppConfig {
        let mail = match (&self.mail.api_url, &self.mail.api_token) {
            (Some(api_url), Some(api_token)) => Some(HttpMailerConfig {
                api_url: api_url.clone(),
                api_token: api_token.clone(),
                from: self.mail.from.clone(),
            }),
            _ => None,
        };

        AppConfig {
            database_url: self.database.database_url.clone(),
            database_max_connections: self.database.database_max_connections,
            auth_token_key: self.auth.auth_token_key.clone(),
            razorpay: RazorpayConfig {
                key_id: self.payments.razorpay_key_id.clone(),
                key_secret: self.payments.razorpay_key_secret.clone(),
                base_url: self.payments.razorpay_base_url.clone(),
            },
            mail,
            images: ImageStorageConfig {
                dir: self.storage.image_dir.clone(),
                public_base_url: self.storage.image_base_url.clone(),
            },
            orders: OrderSettings {
                currency: self.payments.currency.clone(),
                product_name: self.mail.product_name.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::{logging::LogFormat, *};

    const REQUIRED: [&str; 7] = [
        "bookshelf-json",
        "--database-url",
        "postgres://localhost/bookshelf",
        "--auth-token-key",
        "token-key",
        "--razorpay-key-id",
        "rzp_test_key",
    ];

    fn parse(extra: &[&str]) -> Result<ServerConfig, clap::Error> {
        let mut args = REQUIRED.to_vec();

        args.extend_from_slice(&["--razorpay-key-secret", "rzp_secret"]);
        args.extend_from_slice(extra);

        ServerConfig::try_parse_from(args)
    }

    #[test]
    fn defaults_fill_optional_groups() -> TestResult {
        let config = parse(&[])?.to_app_config();

        assert_eq!(config.razorpay.base_url, "https://api.razorpay.com");
        assert_eq!(config.orders.currency, "INR");
        assert_eq!(config.images.public_base_url, "http://localhost:8698/images");
        assert!(config.mail.is_none(), "mail should fall back to logging");
        assert_eq!(config.database_max_connections, 10);

        Ok(())
    }

    #[test]
    fn mail_api_needs_url_and_token() -> TestResult {
        let only_url = parse(&["--mail-api-url", "https://mail.example.com/send"])?;

        assert!(only_url.to_app_config().mail.is_none());

        let both = parse(&[
            "--mail-api-url",
            "https://mail.example.com/send",
            "--mail-api-token",
            "secret",
        ])?;

        let mail = both.to_app_config().mail;

        assert!(
            matches!(&mail, Some(mail) if mail.api_url == "https://mail.example.com/send"),
            "expected configured mail API, got {mail:?}"
        );

        Ok(())
    }

    #[test]
    fn telemetry_is_off_by_default() -> TestResult {
        let config = parse(&["--otel-parent-propagation"])?;

        assert!(!config.telemetry.enabled, "export should be opt-in");
        assert!(
            !config.telemetry.propagates_parent(),
            "propagation requires export"
        );
        assert_eq!(config.logging.log_format, LogFormat::Compact);

        let config = parse(&["--otel-enabled", "--otel-sample-ratio", "2.5"])?;

        assert!((config.telemetry.sample_ratio() - 1.0).abs() < f64::EPSILON, "ratio is clamped");

        Ok(())
    }
}
