//! Auth Config

use clap::Args;

/// API token verification settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// HMAC key for API token verifiers
    #[arg(long, env = "AUTH_TOKEN_KEY", hide_env_values = true)]
    pub auth_token_key: String,
}
