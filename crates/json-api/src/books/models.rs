//! Book responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::books::records::BookRecord;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookResponse {
    pub uuid: Uuid,
    pub title: String,
    pub author: String,
    pub description: String,

    /// Price in minor currency units
    pub price: u64,

    /// Copies available to buy
    pub stock: u32,
    pub category_uuid: Uuid,
    pub main_image_url: String,
    pub sub_image_urls: Vec<String>,

    /// Mean review rating, 0 when unreviewed
    pub average_rating: f64,
    pub owner_uuid: Uuid,
    pub created_at: String,
    pub updated_at: String,
}

impl From<BookRecord> for BookResponse {
    fn from(book: BookRecord) -> Self {
        Self {
            uuid: book.uuid.into_uuid(),
            title: book.title,
            author: book.author,
            description: book.description,
            price: book.price,
            stock: book.stock,
            category_uuid: book.category_uuid.into_uuid(),
            main_image_url: book.main_image_url,
            sub_image_urls: book.sub_image_urls,
            average_rating: book.average_rating,
            owner_uuid: book.owner_uuid.into_uuid(),
            created_at: book.created_at.to_string(),
            updated_at: book.updated_at.to_string(),
        }
    }
}
