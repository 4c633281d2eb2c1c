//! Orders Data

use crate::{
    domain::{addresses::records::AddressUuid, orders::records::OrderStatus},
    validation::ValidationErrors,
};

/// Provider callback fields proving a completed payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentVerification {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

impl PaymentVerification {
    /// # Errors
    ///
    /// Returns a message for each missing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        errors.check_present(&self.razorpay_order_id, "Razorpay order id is missing");
        errors.check_present(&self.razorpay_payment_id, "Razorpay payment id is missing");
        errors.check_present(&self.razorpay_signature, "Razorpay signature is missing");

        errors.into_result()
    }
}

/// Checkout request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkout {
    pub address_uuid: AddressUuid,
}

/// Admin order listing filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
}
