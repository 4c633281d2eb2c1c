//! Categories Data

use crate::{
    domain::{categories::records::CategoryUuid, users::records::UserUuid},
    validation::ValidationErrors,
};

/// New Category Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCategory {
    pub uuid: CategoryUuid,
    pub name: String,
    pub owner_uuid: UserUuid,
}

impl NewCategory {
    /// # Errors
    ///
    /// Returns every rule the name breaks.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_name(&self.name)
    }
}

/// Category rename
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryUpdate {
    pub name: String,
}

impl CategoryUpdate {
    /// # Errors
    ///
    /// Returns every rule the name breaks.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        validate_name(&self.name)
    }
}

fn validate_name(name: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    errors.check_length(
        name,
        1,
        100,
        "Category name is required",
        "Category name must be at most 100 characters",
    );

    errors.into_result()
}
