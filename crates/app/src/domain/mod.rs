//! Bookshelf Domain Concerns

pub mod addresses;
pub mod books;
pub mod carts;
pub mod categories;
pub mod orders;
pub mod users;
