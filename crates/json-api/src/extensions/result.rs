//! `Result` helpers for handlers.

use std::fmt::Display;

use tracing::error;

use crate::errors::ApiError;

pub(crate) trait ResultExt<T> {
    /// Log the failure under `context` and answer with an opaque 500.
    fn or_500(self, context: &str) -> Result<T, ApiError>;
}

impl<T, E: Display> ResultExt<T> for Result<T, E> {
    fn or_500(self, context: &str) -> Result<T, ApiError> {
        self.map_err(|source| {
            error!(error = %source, "{context}");

            ApiError::internal()
        })
    }
}
