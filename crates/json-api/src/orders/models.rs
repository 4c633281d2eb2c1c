//! Order responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::{
    domain::orders::records::{
        CheckoutSession, OrderDetails, OrderItemRecord, OrderRecord, ShippingAddress,
    },
    payments::PaymentSession,
};

/// Shipping address captured at checkout.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ShippingAddressResponse {
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
}

impl From<ShippingAddress> for ShippingAddressResponse {
    fn from(address: ShippingAddress) -> Self {
        Self {
            address_line1: address.address_line1,
            address_line2: address.address_line2,
            city: address.city,
            state: address.state,
            country: address.country,
            pincode: address.pincode,
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,
    pub customer_uuid: Uuid,
    pub address: ShippingAddressResponse,

    /// Cart total at checkout, in minor currency units
    pub order_price: u64,
    pub discounted_order_price: u64,

    /// One of `pending`, `paid`, `shipped`, `delivered`, `cancelled`
    pub status: String,
    pub payment_provider: String,

    /// Provider order id
    pub payment_session_id: String,
    pub provider_payment_id: Option<String>,
    pub is_payment_done: bool,
    pub paid_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into_uuid(),
            customer_uuid: order.customer_uuid.into_uuid(),
            address: order.address.into(),
            order_price: order.order_price,
            discounted_order_price: order.discounted_order_price,
            status: order.status.to_string(),
            payment_provider: order.payment_provider.as_str().to_string(),
            payment_session_id: order.payment_session_id,
            provider_payment_id: order.provider_payment_id,
            is_payment_done: order.is_payment_done,
            paid_at: order.paid_at.map(|paid_at| paid_at.to_string()),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub book_uuid: Uuid,
    pub title: String,
    pub main_image_url: String,
    pub quantity: u32,

    /// Price paid per copy
    pub unit_price: u64,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        Self {
            book_uuid: item.book_uuid.into_uuid(),
            title: item.title,
            main_image_url: item.main_image_url,
            quantity: item.quantity,
            unit_price: item.unit_price,
        }
    }
}

/// An order with its purchased lines.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderDetailsResponse {
    pub order: OrderResponse,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderDetails> for OrderDetailsResponse {
    fn from(details: OrderDetails) -> Self {
        Self {
            order: details.order.into(),
            items: details.items.into_iter().map(Into::into).collect(),
        }
    }
}

/// Provider payment session the client completes payment against.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PaymentSessionResponse {
    pub id: String,
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
    pub status: String,
}

impl From<PaymentSession> for PaymentSessionResponse {
    fn from(session: PaymentSession) -> Self {
        Self {
            id: session.id,
            amount: session.amount,
            currency: session.currency,
            receipt: session.receipt,
            status: session.status,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CheckoutResponse {
    pub session: PaymentSessionResponse,
    pub order: OrderDetailsResponse,
}

impl From<CheckoutSession> for CheckoutResponse {
    fn from(checkout: CheckoutSession) -> Self {
        Self {
            session: checkout.session.into(),
            order: checkout.order.into(),
        }
    }
}
