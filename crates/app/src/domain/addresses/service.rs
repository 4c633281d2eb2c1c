//! Addresses service.

use async_trait::async_trait;
use mockall::automock;

use crate::{
    database::Db,
    domain::{
        addresses::{
            data::{AddressUpdate, NewAddress},
            errors::AddressesServiceError,
            records::{AddressRecord, AddressUuid},
            repository::PgAddressesRepository,
        },
        users::records::UserUuid,
    },
    pagination::{Page, PageRequest},
};

#[derive(Debug, Clone)]
pub struct PgAddressesService {
    db: Db,
    repository: PgAddressesRepository,
}

impl PgAddressesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgAddressesRepository::new(),
        }
    }
}

#[async_trait]
impl AddressesService for PgAddressesService {
    async fn list_addresses(
        &self,
        owner: UserUuid,
        page: PageRequest,
    ) -> Result<Page<AddressRecord>, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let (addresses, total) = self.repository.list_addresses(&mut tx, owner, page).await?;

        tx.commit().await?;

        Ok(Page::new(page, total, addresses))
    }

    async fn get_address(
        &self,
        address: AddressUuid,
        owner: UserUuid,
    ) -> Result<AddressRecord, AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let address = self.repository.get_address(&mut tx, address, owner).await?;

        tx.commit().await?;

        Ok(address)
    }

    async fn create_address(
        &self,
        address: NewAddress,
    ) -> Result<AddressRecord, AddressesServiceError> {
        address.validate()?;

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_address(&mut tx, &address).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_address(
        &self,
        address: AddressUuid,
        owner: UserUuid,
        update: AddressUpdate,
    ) -> Result<AddressRecord, AddressesServiceError> {
        update.validate()?;

        let mut tx = self.db.begin().await?;

        let updated = self
            .repository
            .update_address(&mut tx, address, owner, &update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_address(
        &self,
        address: AddressUuid,
        owner: UserUuid,
    ) -> Result<(), AddressesServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self
            .repository
            .delete_address(&mut tx, address, owner)
            .await?;

        if rows_affected == 0 {
            return Err(AddressesServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

/// Address book of a user. Addresses belonging to someone else behave as absent.
#[automock]
#[async_trait]
pub trait AddressesService: Send + Sync {
    async fn list_addresses(
        &self,
        owner: UserUuid,
        page: PageRequest,
    ) -> Result<Page<AddressRecord>, AddressesServiceError>;

    async fn get_address(
        &self,
        address: AddressUuid,
        owner: UserUuid,
    ) -> Result<AddressRecord, AddressesServiceError>;

    async fn create_address(
        &self,
        address: NewAddress,
    ) -> Result<AddressRecord, AddressesServiceError>;

    async fn update_address(
        &self,
        address: AddressUuid,
        owner: UserUuid,
        update: AddressUpdate,
    ) -> Result<AddressRecord, AddressesServiceError>;

    async fn delete_address(
        &self,
        address: AddressUuid,
        owner: UserUuid,
    ) -> Result<(), AddressesServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{domain::users::records::Role, test::TestContext};

    use super::*;

    fn new_address(owner: UserUuid) -> NewAddress {
        NewAddress {
            uuid: AddressUuid::new(),
            owner_uuid: owner,
            address_line1: "12 MG Road".to_string(),
            address_line2: None,
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
            country: None,
            pincode: "411001".to_string(),
        }
    }

    #[tokio::test]
    async fn create_address_applies_defaults() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = ctx.create_user(Role::User).await?;

        let created = ctx.addresses.create_address(new_address(owner)).await?;

        assert_eq!(created.country, "India");
        assert_eq!(created.address_line2, "");
        assert_eq!(created.owner_uuid, owner);

        Ok(())
    }

    #[tokio::test]
    async fn other_users_addresses_are_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = ctx.create_user(Role::User).await?;
        let stranger = ctx.create_user(Role::User).await?;

        let created = ctx.addresses.create_address(new_address(owner)).await?;

        let fetched = ctx.addresses.get_address(created.uuid, stranger).await;
        let updated = ctx
            .addresses
            .update_address(created.uuid, stranger, AddressUpdate::default())
            .await;
        let deleted = ctx.addresses.delete_address(created.uuid, stranger).await;

        assert!(matches!(fetched, Err(AddressesServiceError::NotFound)), "{fetched:?}");
        assert!(matches!(updated, Err(AddressesServiceError::NotFound)), "{updated:?}");
        assert!(matches!(deleted, Err(AddressesServiceError::NotFound)), "{deleted:?}");

        let listed = ctx.addresses.list_addresses(stranger, PageRequest::default()).await?;

        assert_eq!(listed.total_items, 0);

        Ok(())
    }

    #[tokio::test]
    async fn update_address_changes_supplied_fields() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = ctx.create_user(Role::User).await?;

        let created = ctx.addresses.create_address(new_address(owner)).await?;

        let updated = ctx
            .addresses
            .update_address(
                created.uuid,
                owner,
                AddressUpdate {
                    city: Some("Mumbai".to_string()),
                    ..AddressUpdate::default()
                },
            )
            .await?;

        assert_eq!(updated.city, "Mumbai");
        assert_eq!(updated.pincode, created.pincode);

        Ok(())
    }

    #[tokio::test]
    async fn invalid_address_fails_validation() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = ctx.create_user(Role::User).await?;

        let result = ctx
            .addresses
            .create_address(NewAddress {
                pincode: "000000".to_string(),
                ..new_address(owner)
            })
            .await;

        assert!(
            matches!(result, Err(AddressesServiceError::Validation(_))),
            "expected Validation, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn delete_address_then_list_is_empty() -> TestResult {
        let ctx = TestContext::new().await;
        let owner = ctx.create_user(Role::User).await?;

        let created = ctx.addresses.create_address(new_address(owner)).await?;

        ctx.addresses.delete_address(created.uuid, owner).await?;

        let listed = ctx.addresses.list_addresses(owner, PageRequest::default()).await?;

        assert_eq!(listed.total_items, 0);
        assert!(listed.data.is_empty());

        Ok(())
    }
}
