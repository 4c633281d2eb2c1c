//! Addresses Data

use crate::{
    domain::{addresses::records::AddressUuid, users::records::UserUuid},
    validation::{ValidationErrors, is_valid_pincode},
};

/// Country used when none is given.
pub const DEFAULT_COUNTRY: &str = "India";

/// New Address Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAddress {
    pub uuid: AddressUuid,
    pub owner_uuid: UserUuid,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: Option<String>,
    pub pincode: String,
}

/// Address Update Data
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressUpdate {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
}

fn check_line1(errors: &mut ValidationErrors, value: &str) {
    errors.check_length(
        value,
        5,
        100,
        "Address line 1 must be at least 5 characters",
        "Address line 1 must be at most 100 characters",
    );
}

fn check_line2(errors: &mut ValidationErrors, value: &str) {
    if value.trim().chars().count() > 100 {
        errors.push("Address line 2 must be at most 100 characters");
    }
}

fn check_place(errors: &mut ValidationErrors, field: &str, value: &str) {
    errors.check_length(
        value,
        2,
        50,
        &format!("{field} must be at least 2 characters"),
        &format!("{field} must be at most 50 characters"),
    );
}

fn check_pincode(errors: &mut ValidationErrors, value: &str) {
    if !is_valid_pincode(value.trim()) {
        errors.push("Invalid pincode");
    }
}

impl NewAddress {
    /// Country with the default applied.
    #[must_use]
    pub fn country_or_default(&self) -> &str {
        self.country
            .as_deref()
            .map(str::trim)
            .filter(|country| !country.is_empty())
            .unwrap_or(DEFAULT_COUNTRY)
    }

    /// # Errors
    ///
    /// Returns every rule the address breaks.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_line1(&mut errors, &self.address_line1);

        if let Some(line2) = &self.address_line2 {
            check_line2(&mut errors, line2);
        }

        check_place(&mut errors, "City", &self.city);
        check_place(&mut errors, "State", &self.state);
        check_place(&mut errors, "Country", self.country_or_default());
        check_pincode(&mut errors, &self.pincode);

        errors.into_result()
    }
}

impl AddressUpdate {
    /// # Errors
    ///
    /// Returns every rule the supplied fields break.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(line1) = &self.address_line1 {
            check_line1(&mut errors, line1);
        }

        if let Some(line2) = &self.address_line2 {
            check_line2(&mut errors, line2);
        }

        for (field, value) in [
            ("City", &self.city),
            ("State", &self.state),
            ("Country", &self.country),
        ] {
            if let Some(value) = value {
                check_place(&mut errors, field, value);
            }
        }

        if let Some(pincode) = &self.pincode {
            check_pincode(&mut errors, pincode);
        }

        errors.into_result()
    }
}
