//! Carts service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        books::records::BookUuid,
        carts::{
            data::CartItemUpsert,
            errors::CartsServiceError,
            records::CartAggregate,
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgCartsService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
}

impl PgCartsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
        }
    }
}

#[async_trait]
impl CartsService for PgCartsService {
    async fn get_cart(&self, owner: UserUuid) -> Result<CartAggregate, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        let lines = self.items_repository.get_cart_lines(&mut tx, owner).await?;

        tx.commit().await?;

        CartAggregate::from_lines(lines)
    }

    async fn upsert_item(
        &self,
        owner: UserUuid,
        item: CartItemUpsert,
    ) -> Result<CartAggregate, CartsServiceError> {
        item.validate()?;

        let mut tx = self.db.begin().await?;

        let stock = self
            .items_repository
            .get_book_stock(&mut tx, item.book_uuid)
            .await?;

        if item.quantity > stock {
            return Err(CartsServiceError::insufficient_stock(stock, item.quantity));
        }

        let cart = self.carts_repository.ensure_cart(&mut tx, owner).await?;

        self.items_repository
            .upsert_item(&mut tx, cart.uuid, item.book_uuid, item.quantity)
            .await?;

        let lines = self.items_repository.get_cart_lines(&mut tx, owner).await?;

        tx.commit().await?;

        CartAggregate::from_lines(lines)
    }

    async fn remove_item(
        &self,
        owner: UserUuid,
        book: BookUuid,
    ) -> Result<CartAggregate, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.items_repository.get_book_stock(&mut tx, book).await?;
        self.items_repository.delete_item(&mut tx, owner, book).await?;

        let lines = self.items_repository.get_cart_lines(&mut tx, owner).await?;

        tx.commit().await?;

        CartAggregate::from_lines(lines)
    }

    async fn clear_cart(&self, owner: UserUuid) -> Result<CartAggregate, CartsServiceError> {
        let mut tx = self.db.begin().await?;

        self.items_repository.clear_items(&mut tx, owner).await?;

        let lines = self.items_repository.get_cart_lines(&mut tx, owner).await?;

        tx.commit().await?;

        CartAggregate::from_lines(lines)
    }
}

/// The requesting user's cart, priced at current book prices.
#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Current cart. A user without a cart gets the empty aggregate.
    async fn get_cart(&self, owner: UserUuid) -> Result<CartAggregate, CartsServiceError>;

    /// Set a book's quantity, adding the line if it is new.
    async fn upsert_item(
        &self,
        owner: UserUuid,
        item: CartItemUpsert,
    ) -> Result<CartAggregate, CartsServiceError>;

    /// Remove a book's line. Removing an absent line is not an error.
    async fn remove_item(
        &self,
        owner: UserUuid,
        book: BookUuid,
    ) -> Result<CartAggregate, CartsServiceError>;

    /// Drop every line. Works when the user has no cart yet.
    async fn clear_cart(&self, owner: UserUuid) -> Result<CartAggregate, CartsServiceError>;
}
