//! Order Handlers

pub(crate) mod checkout;
pub(crate) mod get;
pub(crate) mod index;
pub(crate) mod mine;
pub(crate) mod update_status;
pub(crate) mod verify_payment;
