//! Books service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use tracing::warn;

use crate::{
    database::Db,
    domain::{
        books::{
            data::{BookFilter, BookUpdate, NewBook, NewReview},
            errors::BooksServiceError,
            records::{BookRecord, BookUuid, ReviewRecord, ReviewUuid},
            repositories::{BookChanges, BookRow, PgBooksRepository, PgReviewsRepository},
        },
        users::records::UserUuid,
    },
    pagination::{Page, PageRequest},
    storage::{ImageStore, ImageUpload},
};

#[derive(Clone)]
pub struct PgBooksService {
    db: Db,
    books: PgBooksRepository,
    reviews: PgReviewsRepository,
    images: Arc<dyn ImageStore>,
}

impl std::fmt::Debug for PgBooksService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgBooksService")
            .field("db", &self.db)
            .finish_non_exhaustive()
    }
}

impl PgBooksService {
    #[must_use]
    pub fn new(db: Db, images: Arc<dyn ImageStore>) -> Self {
        Self {
            db,
            books: PgBooksRepository::new(),
            reviews: PgReviewsRepository::new(),
            images,
        }
    }

    async fn store_images(
        &self,
        uploads: Vec<ImageUpload>,
    ) -> Result<Vec<String>, BooksServiceError> {
        let mut urls = Vec::with_capacity(uploads.len());

        for upload in uploads {
            match self.images.store(upload).await {
                Ok(url) => urls.push(url),
                Err(error) => {
                    self.discard_images(&urls).await;

                    return Err(error.into());
                }
            }
        }

        Ok(urls)
    }

    /// Remove images no longer referenced. Failures are logged only.
    async fn discard_images(&self, urls: &[String]) {
        for url in urls {
            if let Err(error) = self.images.remove(url).await {
                warn!(%url, %error, "failed to remove image");
            }
        }
    }
}

#[async_trait]
impl BooksService for PgBooksService {
    async fn list_books(
        &self,
        filter: BookFilter,
        page: PageRequest,
    ) -> Result<Page<BookRecord>, BooksServiceError> {
        let mut tx = self.db.begin().await?;

        let (books, total) = self.books.list_books(&mut tx, &filter, page).await?;

        tx.commit().await?;

        Ok(Page::new(page, total, books))
    }

    async fn get_book(&self, book: BookUuid) -> Result<BookRecord, BooksServiceError> {
        let mut tx = self.db.begin().await?;

        let book = self.books.get_book(&mut tx, book).await?;

        tx.commit().await?;

        Ok(book)
    }

    async fn create_book(&self, book: NewBook) -> Result<BookRecord, BooksServiceError> {
        book.validate()?;

        let NewBook {
            uuid,
            title,
            author,
            description,
            price,
            stock,
            category_uuid,
            owner_uuid,
            main_image,
            sub_images,
        } = book;

        let mut uploads = Vec::with_capacity(sub_images.len() + 1);
        uploads.extend(main_image);
        uploads.extend(sub_images);

        let urls = self.store_images(uploads).await?;

        let Some((main_image_url, sub_image_urls)) = urls.split_first() else {
            return Err(BooksServiceError::InvalidData);
        };

        let result = async {
            let mut tx = self.db.begin().await?;

            let created = self
                .books
                .create_book(
                    &mut tx,
                    &BookRow {
                        uuid,
                        title: &title,
                        author: &author,
                        description: &description,
                        price,
                        stock,
                        category_uuid,
                        main_image_url,
                        sub_image_urls,
                        owner_uuid,
                    },
                )
                .await?;

            tx.commit().await?;

            Ok::<_, sqlx::Error>(created)
        }
        .await;

        match result {
            Ok(created) => Ok(created),
            Err(error) => {
                self.discard_images(&urls).await;

                Err(error.into())
            }
        }
    }

    async fn update_book(
        &self,
        book: BookUuid,
        update: BookUpdate,
    ) -> Result<BookRecord, BooksServiceError> {
        update.validate()?;

        let existing = self.get_book(book).await?;

        let BookUpdate {
            title,
            author,
            description,
            price,
            stock,
            category_uuid,
            main_image,
            sub_images,
        } = update;

        let replaces_main = main_image.is_some();
        let replaces_subs = sub_images.is_some();

        let mut uploads: Vec<ImageUpload> = main_image.into_iter().collect();
        uploads.extend(sub_images.unwrap_or_default());

        let urls = self.store_images(uploads).await?;

        let (main_image_url, sub_image_urls) = if replaces_main {
            (urls.first().map(String::as_str), urls.get(1..))
        } else {
            (None, Some(urls.as_slice()))
        };

        let changes = BookChanges {
            title: title.as_deref(),
            author: author.as_deref(),
            description: description.as_deref(),
            price,
            stock,
            category_uuid,
            main_image_url,
            sub_image_urls: sub_image_urls.filter(|_| replaces_subs),
        };

        let result = async {
            let mut tx = self.db.begin().await?;

            let updated = self.books.update_book(&mut tx, book, &changes).await?;

            tx.commit().await?;

            Ok::<_, sqlx::Error>(updated)
        }
        .await;

        match result {
            Ok(updated) => {
                let mut replaced = Vec::new();

                if replaces_main {
                    replaced.push(existing.main_image_url);
                }

                if replaces_subs {
                    replaced.extend(existing.sub_image_urls);
                }

                self.discard_images(&replaced).await;

                Ok(updated)
            }
            Err(error) => {
                self.discard_images(&urls).await;

                Err(error.into())
            }
        }
    }

    async fn delete_book(&self, book: BookUuid) -> Result<(), BooksServiceError> {
        let mut tx = self.db.begin().await?;

        let deleted = self
            .books
            .delete_book(&mut tx, book)
            .await
            .map_err(|error| match BooksServiceError::from(error) {
                BooksServiceError::InvalidReference => BooksServiceError::InUse,
                other => other,
            })?
            .ok_or(BooksServiceError::NotFound)?;

        tx.commit().await?;

        let mut urls = vec![deleted.main_image_url];
        urls.extend(deleted.sub_image_urls);

        self.discard_images(&urls).await;

        Ok(())
    }

    async fn list_reviews(
        &self,
        book: BookUuid,
        page: PageRequest,
    ) -> Result<Page<ReviewRecord>, BooksServiceError> {
        let mut tx = self.db.begin().await?;

        self.books.get_book(&mut tx, book).await?;

        let (reviews, total) = self.reviews.list_reviews(&mut tx, book, page).await?;

        tx.commit().await?;

        Ok(Page::new(page, total, reviews))
    }

    async fn add_review(&self, review: NewReview) -> Result<ReviewRecord, BooksServiceError> {
        review.validate()?;

        let mut tx = self.db.begin().await?;

        self.books.lock_book(&mut tx, review.book_uuid).await?;

        let created = self.reviews.create_review(&mut tx, &review).await?;

        self.reviews
            .refresh_average_rating(&mut tx, review.book_uuid)
            .await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn delete_review(
        &self,
        review: ReviewUuid,
        author: UserUuid,
    ) -> Result<(), BooksServiceError> {
        let mut tx = self.db.begin().await?;

        let book = self
            .reviews
            .delete_review(&mut tx, review, author)
            .await?
            .ok_or(BooksServiceError::NotFound)?;

        self.reviews.refresh_average_rating(&mut tx, book).await?;

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait BooksService: Send + Sync {
    /// Newest books first, optionally filtered by category and title/author search.
    async fn list_books(
        &self,
        filter: BookFilter,
        page: PageRequest,
    ) -> Result<Page<BookRecord>, BooksServiceError>;

    async fn get_book(&self, book: BookUuid) -> Result<BookRecord, BooksServiceError>;

    /// Store the uploaded images and create the book.
    async fn create_book(&self, book: NewBook) -> Result<BookRecord, BooksServiceError>;

    /// Apply a partial update. Replaced images are removed from storage.
    async fn update_book(
        &self,
        book: BookUuid,
        update: BookUpdate,
    ) -> Result<BookRecord, BooksServiceError>;

    /// Delete a book and, afterwards, its images.
    async fn delete_book(&self, book: BookUuid) -> Result<(), BooksServiceError>;

    async fn list_reviews(
        &self,
        book: BookUuid,
        page: PageRequest,
    ) -> Result<Page<ReviewRecord>, BooksServiceError>;

    /// Add a review and recompute the book's average rating.
    async fn add_review(&self, review: NewReview) -> Result<ReviewRecord, BooksServiceError>;

    /// Delete a review written by `author`.
    async fn delete_review(
        &self,
        review: ReviewUuid,
        author: UserUuid,
    ) -> Result<(), BooksServiceError>;
}
