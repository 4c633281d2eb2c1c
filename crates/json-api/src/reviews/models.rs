//! Review responses

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::books::records::ReviewRecord;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReviewResponse {
    pub uuid: Uuid,
    pub book_uuid: Uuid,
    pub author_uuid: Uuid,

    /// 1 to 5
    pub rating: u8,
    pub comment: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<ReviewRecord> for ReviewResponse {
    fn from(review: ReviewRecord) -> Self {
        Self {
            uuid: review.uuid.into_uuid(),
            book_uuid: review.book_uuid.into_uuid(),
            author_uuid: review.author_uuid.into_uuid(),
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at.to_string(),
            updated_at: review.updated_at.to_string(),
        }
    }
}
