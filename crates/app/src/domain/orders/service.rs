//! Orders service.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use rand::{Rng, distributions::Alphanumeric, thread_rng};
use sqlx::{Postgres, Transaction};
use tracing::{error, info, warn};

use crate::{
    database::Db,
    domain::{
        addresses::repository::PgAddressesRepository,
        carts::{records::CartAggregate, repositories::PgCartItemsRepository},
        orders::{
            data::{Checkout, OrderFilter, PaymentVerification},
            errors::OrdersServiceError,
            records::{CheckoutSession, OrderDetails, OrderRecord, OrderStatus, OrderUuid},
            repository::{PendingOrder, PgOrdersRepository},
            status::check_admin_transition,
        },
        users::{
            records::{UserRecord, UserUuid},
            repository::PgUsersRepository,
        },
    },
    mail::{
        Mailer,
        templates::{ConfirmationLine, OrderConfirmation},
    },
    pagination::{Page, PageRequest},
    payments::PaymentGateway,
};

const RECEIPT_LENGTH: usize = 10;

/// Settings shared by every order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSettings {
    /// ISO currency code sent to the payment provider.
    pub currency: String,

    /// Shop name used in customer mail.
    pub product_name: String,
}

impl Default for OrderSettings {
    fn default() -> Self {
        Self {
            currency: "INR".to_string(),
            product_name: "Bookshelf".to_string(),
        }
    }
}

fn receipt_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RECEIPT_LENGTH)
        .map(char::from)
        .collect()
}

pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
    addresses_repository: PgAddressesRepository,
    cart_items_repository: PgCartItemsRepository,
    users_repository: PgUsersRepository,
    gateway: Arc<dyn PaymentGateway>,
    mailer: Arc<dyn Mailer>,
    settings: OrderSettings,
}

impl fmt::Debug for PgOrdersService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgOrdersService")
            .field("db", &self.db)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl PgOrdersService {
    #[must_use]
    pub fn new(
        db: Db,
        gateway: Arc<dyn PaymentGateway>,
        mailer: Arc<dyn Mailer>,
        settings: OrderSettings,
    ) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
            addresses_repository: PgAddressesRepository::new(),
            cart_items_repository: PgCartItemsRepository::new(),
            users_repository: PgUsersRepository::new(),
            gateway,
            mailer,
            settings,
        }
    }

    async fn load_details(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderRecord,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let items = self.repository.list_order_items(tx, order.uuid).await?;

        Ok(OrderDetails { order, items })
    }

    async fn persist_order(
        &self,
        pending: &PendingOrder<'_>,
        cart: &CartAggregate,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.create_order(&mut tx, pending).await?;

        self.repository
            .create_order_items(&mut tx, order.uuid, &cart.items)
            .await?;

        let details = self.load_details(&mut tx, order).await?;

        tx.commit().await?;

        Ok(details)
    }

    async fn send_confirmation(&self, customer: &UserRecord, details: &OrderDetails) {
        let confirmation = OrderConfirmation {
            product_name: self.settings.product_name.clone(),
            username: customer.username.clone(),
            currency: self.settings.currency.clone(),
            lines: details
                .items
                .iter()
                .map(|item| ConfirmationLine {
                    title: item.title.clone(),
                    unit_price: item.unit_price,
                    quantity: item.quantity,
                })
                .collect(),
            total: details.order.discounted_order_price,
        };

        if let Err(error) = self.mailer.send(confirmation.to_email(&customer.email)).await {
            warn!(
                order = %details.order.uuid,
                error = %error,
                "failed to send order confirmation"
            );
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    #[tracing::instrument(
        name = "orders.service.checkout",
        skip(self, checkout),
        fields(customer_uuid = %customer, address_uuid = %checkout.address_uuid),
        err
    )]
    async fn checkout(
        &self,
        customer: UserUuid,
        checkout: Checkout,
    ) -> Result<CheckoutSession, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let address = match self
            .addresses_repository
            .get_address(&mut tx, checkout.address_uuid, customer)
            .await
        {
            Ok(address) => address,
            Err(sqlx::Error::RowNotFound) => return Err(OrdersServiceError::AddressNotFound),
            Err(error) => return Err(error.into()),
        };

        let lines = self
            .cart_items_repository
            .get_cart_lines(&mut tx, customer)
            .await?;

        tx.commit().await?;

        let cart = CartAggregate::from_lines(lines)?;

        if cart.is_empty() {
            return Err(OrdersServiceError::InvalidState(
                "User cart is empty".to_string(),
            ));
        }

        let receipt = receipt_token();

        let session = self
            .gateway
            .create_order(cart.discounted_total, &self.settings.currency, &receipt)
            .await?;

        let pending = PendingOrder {
            uuid: OrderUuid::new(),
            customer,
            address: &address,
            order_price: cart.cart_total,
            discounted_order_price: cart.discounted_total,
            payment_session_id: &session.id,
        };

        let persisted = self.persist_order(&pending, &cart).await;

        let order = persisted.inspect_err(|error| {
            error!(
                session = %session.id,
                error = %error,
                "payment session opened but order was not saved"
            );
        })?;

        info!(order = %order.order.uuid, session = %session.id, "opened payment session");

        Ok(CheckoutSession { session, order })
    }

    #[tracing::instrument(
        name = "orders.service.verify_payment",
        skip(self, verification),
        fields(customer_uuid = %customer),
        err
    )]
    async fn verify_payment(
        &self,
        customer: UserUuid,
        verification: PaymentVerification,
    ) -> Result<OrderDetails, OrdersServiceError> {
        verification.validate()?;

        let order_id = verification.razorpay_order_id.trim();
        let payment_id = verification.razorpay_payment_id.trim();
        let signature = verification.razorpay_signature.trim();

        if !self.gateway.verify_signature(order_id, payment_id, signature) {
            return Err(OrdersServiceError::InvalidSignature);
        }

        let mut tx = self.db.begin().await?;

        let order = self
            .repository
            .lock_order_by_session(&mut tx, order_id)
            .await?
            .filter(|order| order.customer_uuid == customer)
            .ok_or(OrdersServiceError::NotFound)?;

        if order.is_payment_done {
            if order.provider_payment_id.as_deref() != Some(payment_id) {
                warn!(
                    order = %order.uuid,
                    payment = payment_id,
                    "order already paid with a different payment"
                );
            }

            let details = self.load_details(&mut tx, order).await?;

            tx.commit().await?;

            return Ok(details);
        }

        if order.status != OrderStatus::Pending {
            return Err(OrdersServiceError::InvalidState(format!(
                "order is {}",
                order.status
            )));
        }

        let order = self
            .repository
            .mark_paid(&mut tx, order.uuid, payment_id)
            .await?;

        for claim in self.repository.lock_order_stock(&mut tx, order.uuid).await? {
            if claim.is_oversold() {
                warn!(
                    order = %order.uuid,
                    book = %claim.book_uuid,
                    stock = claim.stock,
                    quantity = claim.quantity,
                    "order oversells book, clamping stock at zero"
                );
            }
        }

        self.repository.decrement_stock(&mut tx, order.uuid).await?;
        self.cart_items_repository
            .clear_items(&mut tx, customer)
            .await?;

        let contact = self.users_repository.get_user(&mut tx, customer).await?;
        let details = self.load_details(&mut tx, order).await?;

        tx.commit().await?;

        info!(order = %details.order.uuid, payment = payment_id, "order paid");

        self.send_confirmation(&contact, &details).await;

        Ok(details)
    }

    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self),
        fields(order_uuid = %order, status = %status),
        err
    )]
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let current = self.repository.lock_order(&mut tx, order).await?;

        check_admin_transition(current.status, status)?;

        let updated = self.repository.update_status(&mut tx, order, status).await?;
        let details = self.load_details(&mut tx, updated).await?;

        tx.commit().await?;

        info!(order = %order, from = %current.status, to = %status, "order status changed");

        Ok(details)
    }

    async fn get_order(
        &self,
        order: OrderUuid,
        customer: Option<UserUuid>,
    ) -> Result<OrderDetails, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let order = self.repository.get_order(&mut tx, order, customer).await?;
        let details = self.load_details(&mut tx, order).await?;

        tx.commit().await?;

        Ok(details)
    }

    async fn list_orders(
        &self,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let (orders, total) = self
            .repository
            .list_orders(&mut tx, filter, None, page)
            .await?;

        tx.commit().await?;

        Ok(Page::new(page, total, orders))
    }

    async fn list_customer_orders(
        &self,
        customer: UserUuid,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin().await?;

        let (orders, total) = self
            .repository
            .list_orders(&mut tx, OrderFilter::default(), Some(customer), page)
            .await?;

        tx.commit().await?;

        Ok(Page::new(page, total, orders))
    }
}

/// Checkout, payment fulfillment and order administration.
#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Open a payment session for the customer's cart and record a pending
    /// order against it.
    async fn checkout(
        &self,
        customer: UserUuid,
        checkout: Checkout,
    ) -> Result<CheckoutSession, OrdersServiceError>;

    /// Confirm a provider payment and fulfil its order.
    ///
    /// Replaying an already verified payment returns the paid order without
    /// touching stock, cart or mail again.
    async fn verify_payment(
        &self,
        customer: UserUuid,
        verification: PaymentVerification,
    ) -> Result<OrderDetails, OrdersServiceError>;

    /// Move an order along the admin transition table. `Paid` is never an
    /// admin target.
    async fn update_status(
        &self,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderDetails, OrdersServiceError>;

    /// Fetch an order. With `customer` set, other customers' orders are
    /// reported as not found.
    async fn get_order(
        &self,
        order: OrderUuid,
        customer: Option<UserUuid>,
    ) -> Result<OrderDetails, OrdersServiceError>;

    /// Page through every order, newest first, optionally by status.
    async fn list_orders(
        &self,
        filter: OrderFilter,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError>;

    /// Page through one customer's orders, newest first.
    async fn list_customer_orders(
        &self,
        customer: UserUuid,
        page: PageRequest,
    ) -> Result<Page<OrderRecord>, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::{
            books::records::BookUuid,
            carts::{CartsService, data::CartItemUpsert},
            users::records::Role,
        },
        payments::signature,
        test::{TestContext, helpers::TEST_GATEWAY_SECRET},
    };

    use super::*;

    struct Purchase {
        customer: UserUuid,
        book: BookUuid,
        session: CheckoutSession,
    }

    async fn purchase(ctx: &TestContext, price: u64, stock: u32, quantity: u32) -> TestResult<Purchase> {
        let customer = ctx.create_user(Role::User).await?;
        let book = ctx.create_book(price, stock).await?;
        let address = ctx.create_address(customer).await?;

        ctx.carts
            .upsert_item(customer, CartItemUpsert { book_uuid: book, quantity })
            .await?;

        let session = ctx
            .orders
            .checkout(customer, Checkout { address_uuid: address })
            .await?;

        Ok(Purchase { customer, book, session })
    }

    fn verification(session_id: &str, payment_id: &str) -> PaymentVerification {
        PaymentVerification {
            razorpay_order_id: session_id.to_string(),
            razorpay_payment_id: payment_id.to_string(),
            razorpay_signature: signature::expected_signature(
                TEST_GATEWAY_SECRET,
                session_id,
                payment_id,
            ),
        }
    }

    #[tokio::test]
    async fn checkout_records_pending_order_for_cart_total() -> TestResult {
        let ctx = TestContext::new().await;
        let Purchase { book, session, .. } = purchase(&ctx, 1_250, 5, 2).await?;

        assert_eq!(session.session.amount, 2_500);
        assert_eq!(session.session.currency, "INR");
        assert_eq!(session.session.receipt.len(), RECEIPT_LENGTH);

        let order = &session.order.order;

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(!order.is_payment_done, "new orders are unpaid");
        assert_eq!(order.payment_session_id, session.session.id);
        assert_eq!(order.order_price, 2_500);
        assert_eq!(order.discounted_order_price, 2_500);
        assert_eq!(session.order.items.len(), 1);

        let item = session.order.items.first().ok_or("missing item")?;

        assert_eq!(item.book_uuid, book);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.unit_price, 1_250);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_with_empty_cart_is_invalid_state() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_user(Role::User).await?;
        let address = ctx.create_address(customer).await?;

        let result = ctx
            .orders
            .checkout(customer, Checkout { address_uuid: address })
            .await;

        assert!(
            matches!(&result, Err(OrdersServiceError::InvalidState(message)) if message == "User cart is empty"),
            "expected InvalidState, got {result:?}"
        );
        assert_eq!(ctx.gateway_sessions(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_with_another_customers_address_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_user(Role::User).await?;
        let other = ctx.create_user(Role::User).await?;
        let address = ctx.create_address(other).await?;

        let result = ctx
            .orders
            .checkout(customer, Checkout { address_uuid: address })
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::AddressNotFound)),
            "expected AddressNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn verify_payment_fulfils_order() -> TestResult {
        let ctx = TestContext::new().await;
        let Purchase { customer, book, session } = purchase(&ctx, 1_000, 5, 2).await?;

        let details = ctx
            .orders
            .verify_payment(customer, verification(&session.session.id, "pay_1"))
            .await?;

        assert_eq!(details.order.status, OrderStatus::Paid);
        assert!(details.order.is_payment_done, "order should be paid");
        assert_eq!(details.order.provider_payment_id.as_deref(), Some("pay_1"));
        assert!(details.order.paid_at.is_some(), "paid_at should be set");

        assert_eq!(ctx.book_stock(book).await?, 3);
        assert!(ctx.carts.get_cart(customer).await?.is_empty(), "cart should be cleared");
        assert_eq!(ctx.sent_emails().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn verify_payment_twice_fulfils_once() -> TestResult {
        let ctx = TestContext::new().await;
        let Purchase { customer, book, session } = purchase(&ctx, 1_000, 5, 2).await?;

        let first = ctx
            .orders
            .verify_payment(customer, verification(&session.session.id, "pay_1"))
            .await?;
        let second = ctx
            .orders
            .verify_payment(customer, verification(&session.session.id, "pay_1"))
            .await?;

        assert_eq!(first.order, second.order);
        assert_eq!(ctx.book_stock(book).await?, 3);
        assert_eq!(ctx.sent_emails().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn verify_payment_decrements_from_snapshot() -> TestResult {
        let ctx = TestContext::new().await;
        let Purchase { customer, book, session } = purchase(&ctx, 1_000, 5, 2).await?;

        ctx.carts
            .upsert_item(customer, CartItemUpsert { book_uuid: book, quantity: 4 })
            .await?;

        ctx.orders
            .verify_payment(customer, verification(&session.session.id, "pay_1"))
            .await?;

        assert_eq!(ctx.book_stock(book).await?, 3);

        Ok(())
    }

    #[tokio::test]
    async fn verify_payment_clamps_oversold_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let Purchase { customer, book, session } = purchase(&ctx, 1_000, 3, 3).await?;

        ctx.set_book_stock(book, 1).await?;

        ctx.orders
            .verify_payment(customer, verification(&session.session.id, "pay_1"))
            .await?;

        assert_eq!(ctx.book_stock(book).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn verify_payment_with_bad_signature_changes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let Purchase { customer, book, session } = purchase(&ctx, 1_000, 5, 2).await?;

        let mut payload = verification(&session.session.id, "pay_1");
        payload.razorpay_signature = "00".repeat(32);

        let result = ctx.orders.verify_payment(customer, payload).await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidSignature)),
            "expected InvalidSignature, got {result:?}"
        );
        assert_eq!(ctx.book_stock(book).await?, 5);
        assert!(!ctx.carts.get_cart(customer).await?.is_empty(), "cart should be kept");
        assert!(ctx.sent_emails().is_empty(), "no mail for a rejected payment");

        Ok(())
    }

    #[tokio::test]
    async fn verify_payment_with_missing_fields_is_validation_error() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = ctx.create_user(Role::User).await?;

        let result = ctx
            .orders
            .verify_payment(
                customer,
                PaymentVerification {
                    razorpay_order_id: String::new(),
                    razorpay_payment_id: "pay_1".to_string(),
                    razorpay_signature: "sig".to_string(),
                },
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn verify_payment_for_another_customer_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let Purchase { book, session, .. } = purchase(&ctx, 1_000, 5, 2).await?;
        let intruder = ctx.create_user(Role::User).await?;

        let result = ctx
            .orders
            .verify_payment(intruder, verification(&session.session.id, "pay_1"))
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
        assert_eq!(ctx.book_stock(book).await?, 5);

        Ok(())
    }

    #[tokio::test]
    async fn verify_payment_for_cancelled_order_is_invalid_state() -> TestResult {
        let ctx = TestContext::new().await;
        let Purchase { customer, book, session } = purchase(&ctx, 1_000, 5, 2).await?;

        ctx.orders
            .update_status(session.order.order.uuid, OrderStatus::Cancelled)
            .await?;

        let result = ctx
            .orders
            .verify_payment(customer, verification(&session.session.id, "pay_1"))
            .await;

        assert!(
            matches!(&result, Err(OrdersServiceError::InvalidState(message)) if message == "order is cancelled"),
            "expected InvalidState, got {result:?}"
        );
        assert_eq!(ctx.book_stock(book).await?, 5);
        assert!(!ctx.carts.get_cart(customer).await?.is_empty(), "cart should be kept");
        assert!(ctx.sent_emails().is_empty(), "no mail for a cancelled order");

        let order = ctx.orders.get_order(session.order.order.uuid, None).await?;

        assert_eq!(order.order.status, OrderStatus::Cancelled);
        assert!(!order.order.is_payment_done, "cancelled order stays unpaid");

        Ok(())
    }

    #[tokio::test]
    async fn update_status_follows_transition_table() -> TestResult {
        let ctx = TestContext::new().await;
        let Purchase { customer, session, .. } = purchase(&ctx, 1_000, 5, 1).await?;
        let order = session.order.order.uuid;

        let result = ctx.orders.update_status(order, OrderStatus::Shipped).await;

        assert!(
            matches!(result, Err(OrdersServiceError::InvalidTransition { .. })),
            "expected InvalidTransition, got {result:?}"
        );

        ctx.orders
            .verify_payment(customer, verification(&session.session.id, "pay_1"))
            .await?;

        let shipped = ctx.orders.update_status(order, OrderStatus::Shipped).await?;
        assert_eq!(shipped.order.status, OrderStatus::Shipped);

        let delivered = ctx.orders.update_status(order, OrderStatus::Delivered).await?;
        assert_eq!(delivered.order.status, OrderStatus::Delivered);

        let result = ctx.orders.update_status(order, OrderStatus::Cancelled).await;

        assert!(
            matches!(&result, Err(OrdersServiceError::InvalidState(message)) if message == "order is already delivered"),
            "expected InvalidState, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_status_of_missing_order_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx
            .orders
            .update_status(OrderUuid::new(), OrderStatus::Cancelled)
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_order_hides_other_customers_orders() -> TestResult {
        let ctx = TestContext::new().await;
        let Purchase { customer, session, .. } = purchase(&ctx, 1_000, 5, 1).await?;
        let other = ctx.create_user(Role::User).await?;
        let order = session.order.order.uuid;

        let own = ctx.orders.get_order(order, Some(customer)).await?;
        assert_eq!(own.order.uuid, order);

        let admin_view = ctx.orders.get_order(order, None).await?;
        assert_eq!(admin_view.items.len(), 1);

        let result = ctx.orders.get_order(order, Some(other)).await;

        assert!(
            matches!(result, Err(OrdersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn list_orders_filters_by_status_and_customer() -> TestResult {
        let ctx = TestContext::new().await;
        let paid = purchase(&ctx, 1_000, 5, 1).await?;
        let pending = purchase(&ctx, 500, 5, 1).await?;

        ctx.orders
            .verify_payment(paid.customer, verification(&paid.session.session.id, "pay_1"))
            .await?;

        let all = ctx
            .orders
            .list_orders(OrderFilter::default(), PageRequest::new(None, None))
            .await?;
        assert_eq!(all.total_items, 2);

        let only_paid = ctx
            .orders
            .list_orders(
                OrderFilter { status: Some(OrderStatus::Paid) },
                PageRequest::new(None, None),
            )
            .await?;
        assert_eq!(only_paid.total_items, 1);
        assert_eq!(
            only_paid.data.first().map(|order| order.uuid),
            Some(paid.session.order.order.uuid)
        );

        let mine = ctx
            .orders
            .list_customer_orders(pending.customer, PageRequest::new(None, None))
            .await?;
        assert_eq!(mine.total_items, 1);
        assert_eq!(
            mine.data.first().map(|order| order.uuid),
            Some(pending.session.order.order.uuid)
        );

        Ok(())
    }

    #[test]
    fn receipt_tokens_are_alphanumeric() {
        let receipt = receipt_token();

        assert_eq!(receipt.len(), RECEIPT_LENGTH);
        assert!(
            receipt.chars().all(|c| c.is_ascii_alphanumeric()),
            "unexpected receipt {receipt}"
        );
    }
}
