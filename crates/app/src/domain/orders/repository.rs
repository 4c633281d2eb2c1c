//! Orders Repository

use std::str::FromStr;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    database::{amount_param, count_param, try_get_amount, try_get_count},
    domain::{
        addresses::records::AddressRecord,
        books::records::BookUuid,
        carts::records::CartLine,
        orders::{
            data::OrderFilter,
            records::{OrderItemRecord, OrderRecord, OrderStatus, OrderUuid, ShippingAddress},
        },
        users::records::UserUuid,
    },
    pagination::PageRequest,
};

const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const CREATE_ORDER_ITEMS_SQL: &str = include_str!("sql/create_order_items.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("sql/lock_order.sql");
const LOCK_ORDER_BY_SESSION_SQL: &str = include_str!("sql/lock_order_by_session.sql");
const LIST_ORDER_ITEMS_SQL: &str = include_str!("sql/list_order_items.sql");
const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const COUNT_ORDERS_SQL: &str = include_str!("sql/count_orders.sql");
const MARK_ORDER_PAID_SQL: &str = include_str!("sql/mark_order_paid.sql");
const UPDATE_ORDER_STATUS_SQL: &str = include_str!("sql/update_order_status.sql");
const LOCK_ORDER_STOCK_SQL: &str = include_str!("sql/lock_order_stock.sql");
const DECREMENT_STOCK_SQL: &str = include_str!("sql/decrement_stock.sql");

/// Fields of a pending order written at checkout.
#[derive(Debug)]
pub(crate) struct PendingOrder<'a> {
    pub(crate) uuid: OrderUuid,
    pub(crate) customer: UserUuid,
    pub(crate) address: &'a AddressRecord,
    pub(crate) order_price: u64,
    pub(crate) discounted_order_price: u64,
    pub(crate) payment_session_id: &'a str,
}

/// A book's stock next to the quantity an order takes from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct StockClaim {
    pub(crate) book_uuid: BookUuid,
    pub(crate) stock: u32,
    pub(crate) quantity: u32,
}

impl StockClaim {
    pub(crate) fn is_oversold(self) -> bool {
        self.quantity > self.stock
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &PendingOrder<'_>,
    ) -> Result<OrderRecord, sqlx::Error> {
        let address = order.address;

        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order.customer.into_uuid())
            .bind(&address.address_line1)
            .bind(&address.address_line2)
            .bind(&address.city)
            .bind(&address.state)
            .bind(&address.country)
            .bind(&address.pincode)
            .bind(amount_param(order.order_price, "order_price")?)
            .bind(amount_param(order.discounted_order_price, "discounted_order_price")?)
            .bind(order.payment_session_id)
            .fetch_one(&mut **tx)
            .await
    }

    /// Snapshot cart lines onto the order, keeping their order and current prices.
    pub(crate) async fn create_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        lines: &[CartLine],
    ) -> Result<(), sqlx::Error> {
        let mut books: Vec<Uuid> = Vec::with_capacity(lines.len());
        let mut quantities: Vec<i32> = Vec::with_capacity(lines.len());
        let mut prices: Vec<i64> = Vec::with_capacity(lines.len());

        for line in lines {
            books.push(line.book.uuid.into_uuid());
            quantities.push(count_param(line.quantity, "quantity")?);
            prices.push(amount_param(line.book.price, "unit_price")?);
        }

        query(CREATE_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .bind(books)
            .bind(quantities)
            .bind(prices)
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    /// Fetch an order, restricted to `customer` when given.
    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        customer: Option<UserUuid>,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(customer.map(UserUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn lock_order_by_session(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        session_id: &str,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_BY_SESSION_SQL)
            .bind(session_id)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn list_order_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<OrderItemRecord>, sqlx::Error> {
        query_as::<Postgres, OrderItemRecord>(LIST_ORDER_ITEMS_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Newest orders first, filtered by status and optionally by customer.
    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: OrderFilter,
        customer: Option<UserUuid>,
        page: PageRequest,
    ) -> Result<(Vec<OrderRecord>, u64), sqlx::Error> {
        let status = filter.status.map(OrderStatus::as_str);
        let customer = customer.map(UserUuid::into_uuid);

        let total: i64 = query_scalar(COUNT_ORDERS_SQL)
            .bind(status)
            .bind(customer)
            .fetch_one(&mut **tx)
            .await?;

        let orders = query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(status)
            .bind(customer)
            .bind(i64::from(page.limit()))
            .bind(amount_param(page.offset(), "offset")?)
            .fetch_all(&mut **tx)
            .await?;

        Ok((orders, u64::try_from(total).unwrap_or_default()))
    }

    pub(crate) async fn mark_paid(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        payment_id: &str,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(MARK_ORDER_PAID_SQL)
            .bind(order.into_uuid())
            .bind(payment_id)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(UPDATE_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Lock the books an order draws on, in a stable order.
    pub(crate) async fn lock_order_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<Vec<StockClaim>, sqlx::Error> {
        query_as::<Postgres, StockClaim>(LOCK_ORDER_STOCK_SQL)
            .bind(order.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    /// Subtract every line's quantity from its book, flooring at zero.
    pub(crate) async fn decrement_stock(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DECREMENT_STOCK_SQL)
            .bind(order.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn try_get_parsed<T>(row: &PgRow, column: &str) -> sqlx::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    row.try_get::<String, _>(column)?
        .parse::<T>()
        .map_err(|error| sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(error),
        })
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            customer_uuid: UserUuid::from_uuid(row.try_get("customer_uuid")?),
            address: ShippingAddress {
                address_line1: row.try_get("address_line1")?,
                address_line2: row.try_get("address_line2")?,
                city: row.try_get("city")?,
                state: row.try_get("state")?,
                country: row.try_get("country")?,
                pincode: row.try_get("pincode")?,
            },
            order_price: try_get_amount(row, "order_price")?,
            discounted_order_price: try_get_amount(row, "discounted_order_price")?,
            status: try_get_parsed(row, "status")?,
            payment_provider: try_get_parsed(row, "payment_provider")?,
            payment_session_id: row.try_get("payment_session_id")?,
            provider_payment_id: row.try_get("provider_payment_id")?,
            is_payment_done: row.try_get("is_payment_done")?,
            paid_at: row
                .try_get::<Option<SqlxTimestamp>, _>("paid_at")?
                .map(|paid_at| paid_at.to_jiff()),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            book_uuid: BookUuid::from_uuid(row.try_get("book_uuid")?),
            title: row.try_get("title")?,
            main_image_url: row.try_get("main_image_url")?,
            quantity: try_get_count(row, "quantity")?,
            unit_price: try_get_amount(row, "unit_price")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for StockClaim {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            book_uuid: BookUuid::from_uuid(row.try_get("uuid")?),
            stock: try_get_count(row, "stock")?,
            quantity: try_get_count(row, "quantity")?,
        })
    }
}
