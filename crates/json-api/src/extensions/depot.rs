//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::Depot;

use bookshelf_app::auth::AuthenticatedUser;

use crate::errors::ApiError;

const AUTHENTICATED_USER_KEY: &str = "authenticated_user";

/// Helpers for mapping depot extraction failures to HTTP errors.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn insert_user(&mut self, user: AuthenticatedUser);

    fn user_or_401(&self) -> Result<AuthenticatedUser, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>()
            .map_err(|_ignored| ApiError::internal())
    }

    fn insert_user(&mut self, user: AuthenticatedUser) {
        self.insert(AUTHENTICATED_USER_KEY, user);
    }

    fn user_or_401(&self) -> Result<AuthenticatedUser, ApiError> {
        self.get::<AuthenticatedUser>(AUTHENTICATED_USER_KEY)
            .copied()
            .map_err(|_ignored| ApiError::unauthorized("Authentication required"))
    }
}
