//! Cart Data

use crate::{domain::books::records::BookUuid, validation::ValidationErrors};

/// Set the quantity of a book in the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartItemUpsert {
    pub book_uuid: BookUuid,
    pub quantity: u32,
}

impl CartItemUpsert {
    /// # Errors
    ///
    /// Returns an error when the quantity is zero.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        if self.quantity == 0 {
            return Err(ValidationErrors::single("Quantity must be at least 1"));
        }

        Ok(())
    }
}
