//! Address payloads

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::addresses::records::AddressRecord;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressResponse {
    pub uuid: Uuid,
    pub owner_uuid: Uuid,
    pub address_line1: String,

    /// Empty when not given
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub country: String,

    /// Six digits, not starting with 0
    pub pincode: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AddressRecord> for AddressResponse {
    fn from(address: AddressRecord) -> Self {
        Self {
            uuid: address.uuid.into_uuid(),
            owner_uuid: address.owner_uuid.into_uuid(),
            address_line1: address.address_line1,
            address_line2: address.address_line2,
            city: address.city,
            state: address.state,
            country: address.country,
            pincode: address.pincode,
            created_at: address.created_at.to_string(),
            updated_at: address.updated_at.to_string(),
        }
    }
}
