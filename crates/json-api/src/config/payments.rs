//! Payments Config

use clap::Args;

/// Razorpay settings.
#[derive(Debug, Args)]
pub struct PaymentsConfig {
    /// Razorpay key id
    #[arg(long, env = "RAZORPAY_KEY_ID")]
    pub razorpay_key_id: String,

    /// Razorpay key secret, also the payment signature key
    #[arg(long, env = "RAZORPAY_KEY_SECRET", hide_env_values = true)]
    pub razorpay_key_secret: String,

    /// Razorpay API root
    #[arg(long, env = "RAZORPAY_BASE_URL", default_value = "https://api.razorpay.com")]
    pub razorpay_base_url: String,

    /// Currency for payment sessions
    #[arg(long = "payment-currency", env = "PAYMENT_CURRENCY", default_value = "INR")]
    pub currency: String,
}
