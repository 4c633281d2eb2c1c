//! Razorpay Payment Verification Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use bookshelf_app::domain::orders::{OrdersServiceError, data::PaymentVerification};

use crate::{
    errors::ApiError,
    extensions::*,
    observability::{PaymentOutcome, record_payment_verification},
    orders::{errors::into_api_error, models::OrderDetailsResponse},
    state::State,
};

/// Fields returned by Razorpay checkout once the customer has paid.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct VerifyPaymentRequest {
    #[serde(default)]
    pub razorpay_order_id: String,

    #[serde(default)]
    pub razorpay_payment_id: String,

    #[serde(default)]
    pub razorpay_signature: String,
}

fn outcome_of(error: &OrdersServiceError) -> PaymentOutcome {
    match error {
        OrdersServiceError::InvalidSignature
        | OrdersServiceError::Validation(_)
        | OrdersServiceError::NotFound => PaymentOutcome::Rejected,
        _ => PaymentOutcome::Failed,
    }
}

/// Razorpay Payment Verification Handler
///
/// Checks the payment signature and fulfils the order. Replaying a verified
/// payment returns the paid order unchanged.
#[endpoint(
    tags("orders"),
    summary = "Verify Razorpay Payment",
    security(("bearer_auth" = [])),
)]
#[tracing::instrument(
    name = "orders.verify_payment",
    skip_all,
    fields(razorpay_order_id = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<VerifyPaymentRequest>,
    depot: &mut Depot,
) -> Result<Json<OrderDetailsResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_or_401()?;
    let request = json.into_inner();

    tracing::Span::current().record(
        "razorpay_order_id",
        tracing::field::display(&request.razorpay_order_id),
    );

    let order = state
        .app
        .orders
        .verify_payment(
            user.uuid,
            PaymentVerification {
                razorpay_order_id: request.razorpay_order_id,
                razorpay_payment_id: request.razorpay_payment_id,
                razorpay_signature: request.razorpay_signature,
            },
        )
        .await
        .map_err(|error| {
            record_payment_verification(outcome_of(&error));

            into_api_error(error)
        })?;

    record_payment_verification(PaymentOutcome::Verified);

    Ok(Json(order.into()))
}
