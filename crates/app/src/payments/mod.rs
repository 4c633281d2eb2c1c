//! Payment provider integration.

mod errors;
mod gateway;
mod razorpay;
pub mod signature;

pub use errors::PaymentGatewayError;
pub use gateway::*;
pub use razorpay::{RazorpayClient, RazorpayConfig};
