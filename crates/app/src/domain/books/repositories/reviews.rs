//! Reviews Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::amount_param,
    domain::{
        books::{
            data::NewReview,
            records::{BookUuid, ReviewRecord, ReviewUuid},
        },
        users::records::UserUuid,
    },
    pagination::PageRequest,
};

const LIST_REVIEWS_SQL: &str = include_str!("../sql/list_reviews.sql");
const COUNT_REVIEWS_SQL: &str = include_str!("../sql/count_reviews.sql");
const CREATE_REVIEW_SQL: &str = include_str!("../sql/create_review.sql");
const DELETE_REVIEW_SQL: &str = include_str!("../sql/delete_review.sql");
const REFRESH_AVERAGE_RATING_SQL: &str = include_str!("../sql/refresh_average_rating.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReviewsRepository;

impl PgReviewsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_reviews(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
        page: PageRequest,
    ) -> Result<(Vec<ReviewRecord>, u64), sqlx::Error> {
        let total: i64 = query_scalar(COUNT_REVIEWS_SQL)
            .bind(book.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        let reviews = query_as::<Postgres, ReviewRecord>(LIST_REVIEWS_SQL)
            .bind(book.into_uuid())
            .bind(i64::from(page.limit()))
            .bind(amount_param(page.offset(), "offset")?)
            .fetch_all(&mut **tx)
            .await?;

        Ok((reviews, u64::try_from(total).unwrap_or_default()))
    }

    pub(crate) async fn create_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: &NewReview,
    ) -> Result<ReviewRecord, sqlx::Error> {
        query_as::<Postgres, ReviewRecord>(CREATE_REVIEW_SQL)
            .bind(review.uuid.into_uuid())
            .bind(review.book_uuid.into_uuid())
            .bind(review.author_uuid.into_uuid())
            .bind(i16::from(review.rating))
            .bind(review.comment.trim())
            .fetch_one(&mut **tx)
            .await
    }

    /// Delete the author's review, returning the book it belonged to.
    pub(crate) async fn delete_review(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        review: ReviewUuid,
        author: UserUuid,
    ) -> Result<Option<BookUuid>, sqlx::Error> {
        query_scalar::<Postgres, Uuid>(DELETE_REVIEW_SQL)
            .bind(review.into_uuid())
            .bind(author.into_uuid())
            .fetch_optional(&mut **tx)
            .await
            .map(|book| book.map(BookUuid::from_uuid))
    }

    pub(crate) async fn refresh_average_rating(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<f64, sqlx::Error> {
        query_scalar(REFRESH_AVERAGE_RATING_SQL)
            .bind(book.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ReviewRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let rating: i16 = row.try_get("rating")?;

        Ok(Self {
            uuid: ReviewUuid::from_uuid(row.try_get("uuid")?),
            book_uuid: BookUuid::from_uuid(row.try_get("book_uuid")?),
            author_uuid: UserUuid::from_uuid(row.try_get("author_uuid")?),
            rating: u8::try_from(rating).map_err(|e| sqlx::Error::ColumnDecode {
                index: "rating".to_string(),
                source: Box::new(e),
            })?,
            comment: row.try_get("comment")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
