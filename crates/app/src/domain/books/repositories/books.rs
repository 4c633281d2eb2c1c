//! Books Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{amount_param, count_param, try_get_amount, try_get_count},
    domain::{
        books::{
            data::BookFilter,
            records::{BookRecord, BookUuid},
        },
        categories::records::CategoryUuid,
        users::records::UserUuid,
    },
    pagination::PageRequest,
};

const LIST_BOOKS_SQL: &str = include_str!("../sql/list_books.sql");
const COUNT_BOOKS_SQL: &str = include_str!("../sql/count_books.sql");
const GET_BOOK_SQL: &str = include_str!("../sql/get_book.sql");
const LOCK_BOOK_SQL: &str = include_str!("../sql/lock_book.sql");
const CREATE_BOOK_SQL: &str = include_str!("../sql/create_book.sql");
const UPDATE_BOOK_SQL: &str = include_str!("../sql/update_book.sql");
const DELETE_BOOK_SQL: &str = include_str!("../sql/delete_book.sql");

/// Column values for an insert, images already stored.
#[derive(Debug)]
pub(crate) struct BookRow<'a> {
    pub uuid: BookUuid,
    pub title: &'a str,
    pub author: &'a str,
    pub description: &'a str,
    pub price: u64,
    pub stock: u32,
    pub category_uuid: CategoryUuid,
    pub main_image_url: &'a str,
    pub sub_image_urls: &'a [String],
    pub owner_uuid: UserUuid,
}

/// Column changes for an update; `None` keeps the stored value.
#[derive(Debug, Default)]
pub(crate) struct BookChanges<'a> {
    pub title: Option<&'a str>,
    pub author: Option<&'a str>,
    pub description: Option<&'a str>,
    pub price: Option<u64>,
    pub stock: Option<u32>,
    pub category_uuid: Option<CategoryUuid>,
    pub main_image_url: Option<&'a str>,
    pub sub_image_urls: Option<&'a [String]>,
}

/// Image URLs left behind by a deleted book.
#[derive(Debug)]
pub(crate) struct DeletedBookImages {
    pub main_image_url: String,
    pub sub_image_urls: Vec<String>,
}

/// Escape `LIKE` wildcards so user input matches literally.
fn like_literal(value: &str) -> String {
    value
        .trim()
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBooksRepository;

impl PgBooksRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_books(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &BookFilter,
        page: PageRequest,
    ) -> Result<(Vec<BookRecord>, u64), sqlx::Error> {
        let category = filter.category.map(CategoryUuid::into_uuid);
        let search = filter
            .search
            .as_deref()
            .filter(|search| !search.trim().is_empty())
            .map(like_literal);

        let total: i64 = query_scalar(COUNT_BOOKS_SQL)
            .bind(category)
            .bind(search.as_deref())
            .fetch_one(&mut **tx)
            .await?;

        let books = query_as::<Postgres, BookRecord>(LIST_BOOKS_SQL)
            .bind(category)
            .bind(search.as_deref())
            .bind(i64::from(page.limit()))
            .bind(amount_param(page.offset(), "offset")?)
            .fetch_all(&mut **tx)
            .await?;

        Ok((books, u64::try_from(total).unwrap_or_default()))
    }

    pub(crate) async fn get_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<BookRecord, sqlx::Error> {
        query_as::<Postgres, BookRecord>(GET_BOOK_SQL)
            .bind(book.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Take a row lock on the book, failing with `RowNotFound` if it is absent.
    pub(crate) async fn lock_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<(), sqlx::Error> {
        query_scalar::<Postgres, Uuid>(LOCK_BOOK_SQL)
            .bind(book.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn create_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: &BookRow<'_>,
    ) -> Result<BookRecord, sqlx::Error> {
        query_as::<Postgres, BookRecord>(CREATE_BOOK_SQL)
            .bind(book.uuid.into_uuid())
            .bind(book.title.trim())
            .bind(book.author.trim())
            .bind(book.description.trim())
            .bind(amount_param(book.price, "price")?)
            .bind(count_param(book.stock, "stock")?)
            .bind(book.category_uuid.into_uuid())
            .bind(book.main_image_url)
            .bind(book.sub_image_urls)
            .bind(book.owner_uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
        changes: &BookChanges<'_>,
    ) -> Result<BookRecord, sqlx::Error> {
        let price = changes
            .price
            .map(|price| amount_param(price, "price"))
            .transpose()?;

        let stock = changes
            .stock
            .map(|stock| count_param(stock, "stock"))
            .transpose()?;

        query_as::<Postgres, BookRecord>(UPDATE_BOOK_SQL)
            .bind(book.into_uuid())
            .bind(changes.title.map(str::trim))
            .bind(changes.author.map(str::trim))
            .bind(changes.description.map(str::trim))
            .bind(price)
            .bind(stock)
            .bind(changes.category_uuid.map(CategoryUuid::into_uuid))
            .bind(changes.main_image_url)
            .bind(changes.sub_image_urls)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_book(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        book: BookUuid,
    ) -> Result<Option<DeletedBookImages>, sqlx::Error> {
        let row: Option<(String, Vec<String>)> = query_as(DELETE_BOOK_SQL)
            .bind(book.into_uuid())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(row.map(|(main_image_url, sub_image_urls)| DeletedBookImages {
            main_image_url,
            sub_image_urls,
        }))
    }
}

impl<'r> FromRow<'r, PgRow> for BookRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: BookUuid::from_uuid(row.try_get("uuid")?),
            title: row.try_get("title")?,
            author: row.try_get("author")?,
            description: row.try_get("description")?,
            price: try_get_amount(row, "price")?,
            stock: try_get_count(row, "stock")?,
            category_uuid: CategoryUuid::from_uuid(row.try_get("category_uuid")?),
            main_image_url: row.try_get("main_image_url")?,
            sub_image_urls: row.try_get("sub_image_urls")?,
            average_rating: row.try_get("average_rating")?,
            owner_uuid: UserUuid::from_uuid(row.try_get("owner_uuid")?),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
