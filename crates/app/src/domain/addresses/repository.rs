//! Addresses Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar};

use crate::{
    database::amount_param,
    domain::{
        addresses::{
            data::{AddressUpdate, NewAddress},
            records::{AddressRecord, AddressUuid},
        },
        users::records::UserUuid,
    },
    pagination::PageRequest,
};

const LIST_ADDRESSES_SQL: &str = include_str!("sql/list_addresses.sql");
const COUNT_ADDRESSES_SQL: &str = include_str!("sql/count_addresses.sql");
const GET_ADDRESS_SQL: &str = include_str!("sql/get_address.sql");
const CREATE_ADDRESS_SQL: &str = include_str!("sql/create_address.sql");
const UPDATE_ADDRESS_SQL: &str = include_str!("sql/update_address.sql");
const DELETE_ADDRESS_SQL: &str = include_str!("sql/delete_address.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgAddressesRepository;

impl PgAddressesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_addresses(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        page: PageRequest,
    ) -> Result<(Vec<AddressRecord>, u64), sqlx::Error> {
        let total: i64 = query_scalar(COUNT_ADDRESSES_SQL)
            .bind(owner.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        let addresses = query_as::<Postgres, AddressRecord>(LIST_ADDRESSES_SQL)
            .bind(owner.into_uuid())
            .bind(i64::from(page.limit()))
            .bind(amount_param(page.offset(), "offset")?)
            .fetch_all(&mut **tx)
            .await?;

        Ok((addresses, u64::try_from(total).unwrap_or_default()))
    }

    /// Fetch an address owned by `owner`.
    pub(crate) async fn get_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: AddressUuid,
        owner: UserUuid,
    ) -> Result<AddressRecord, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(GET_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(owner.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: &NewAddress,
    ) -> Result<AddressRecord, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(CREATE_ADDRESS_SQL)
            .bind(address.uuid.into_uuid())
            .bind(address.owner_uuid.into_uuid())
            .bind(address.address_line1.trim())
            .bind(address.address_line2.as_deref().map_or("", str::trim))
            .bind(address.city.trim())
            .bind(address.state.trim())
            .bind(address.country_or_default())
            .bind(address.pincode.trim())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: AddressUuid,
        owner: UserUuid,
        update: &AddressUpdate,
    ) -> Result<AddressRecord, sqlx::Error> {
        query_as::<Postgres, AddressRecord>(UPDATE_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(owner.into_uuid())
            .bind(update.address_line1.as_deref().map(str::trim))
            .bind(update.address_line2.as_deref().map(str::trim))
            .bind(update.city.as_deref().map(str::trim))
            .bind(update.state.as_deref().map(str::trim))
            .bind(update.country.as_deref().map(str::trim))
            .bind(update.pincode.as_deref().map(str::trim))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_address(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        address: AddressUuid,
        owner: UserUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ADDRESS_SQL)
            .bind(address.into_uuid())
            .bind(owner.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for AddressRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: AddressUuid::from_uuid(row.try_get("uuid")?),
            owner_uuid: UserUuid::from_uuid(row.try_get("owner_uuid")?),
            address_line1: row.try_get("address_line1")?,
            address_line2: row.try_get("address_line2")?,
            city: row.try_get("city")?,
            state: row.try_get("state")?,
            country: row.try_get("country")?,
            pincode: row.try_get("pincode")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
