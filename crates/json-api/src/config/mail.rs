//! Mail Config

use clap::Args;

/// Transactional mail settings. Without an API URL and token mail is logged.
#[derive(Debug, Args)]
pub struct MailConfig {
    /// Mail API endpoint
    #[arg(long = "mail-api-url", env = "MAIL_API_URL")]
    pub api_url: Option<String>,

    /// Mail API bearer token
    #[arg(long = "mail-api-token", env = "MAIL_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Sender address
    #[arg(long = "mail-from", env = "MAIL_FROM", default_value = "orders@bookshelf.local")]
    pub from: String,

    /// Shop name used in mail
    #[arg(long = "mail-product-name", env = "MAIL_PRODUCT_NAME", default_value = "Bookshelf")]
    pub product_name: String,
}
