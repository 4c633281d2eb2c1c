//! Book Records

use jiff::Timestamp;

use crate::{
    domain::{categories::records::CategoryUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Book UUID
pub type BookUuid = TypedUuid<BookRecord>;

/// Book Record
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub uuid: BookUuid,
    pub title: String,
    pub author: String,
    pub description: String,

    /// Price in minor currency units.
    pub price: u64,
    pub stock: u32,
    pub category_uuid: CategoryUuid,
    pub main_image_url: String,
    pub sub_image_urls: Vec<String>,

    /// Mean review rating, `0.0` when unreviewed.
    pub average_rating: f64,
    pub owner_uuid: UserUuid,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Review UUID
pub type ReviewUuid = TypedUuid<ReviewRecord>;

/// Review Record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRecord {
    pub uuid: ReviewUuid,
    pub book_uuid: BookUuid,
    pub author_uuid: UserUuid,
    pub rating: u8,
    pub comment: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
