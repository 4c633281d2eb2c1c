//! Cart Records

use jiff::Timestamp;

use crate::{
    domain::{
        books::records::BookRecord, carts::CartsServiceError, users::records::UserUuid,
    },
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub owner_uuid: UserUuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A cart line joined to the book's current details.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub book: BookRecord,
    pub quantity: u32,
}

impl CartLine {
    /// Current price of the line, `None` on overflow.
    #[must_use]
    pub fn line_total(&self) -> Option<u64> {
        self.book.price.checked_mul(u64::from(self.quantity))
    }
}

/// A user's cart priced at read time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CartAggregate {
    pub items: Vec<CartLine>,
    pub cart_total: u64,

    /// Equal to `cart_total`; there is no discount engine.
    pub discounted_total: u64,
}

impl CartAggregate {
    /// Price a list of lines.
    ///
    /// # Errors
    ///
    /// Returns [`CartsServiceError::InvalidData`] if the total overflows.
    pub fn from_lines(items: Vec<CartLine>) -> Result<Self, CartsServiceError> {
        let cart_total = items
            .iter()
            .try_fold(0_u64, |total, line| total.checked_add(line.line_total()?))
            .ok_or(CartsServiceError::InvalidData)?;

        Ok(Self {
            items,
            cart_total,
            discounted_total: cart_total,
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
