//! Cart responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use bookshelf_app::domain::carts::records::{CartAggregate, CartLine};

use crate::books::BookResponse;

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// Lines in the order they were first added
    pub items: Vec<CartLineResponse>,

    /// Sum of current price times quantity
    pub cart_total: u64,
    pub discounted_total: u64,
}

impl From<CartAggregate> for CartResponse {
    fn from(cart: CartAggregate) -> Self {
        Self {
            items: cart.items.into_iter().map(Into::into).collect(),
            cart_total: cart.cart_total,
            discounted_total: cart.discounted_total,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    pub book: BookResponse,
    pub quantity: u32,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            book: line.book.into(),
            quantity: line.quantity,
        }
    }
}
