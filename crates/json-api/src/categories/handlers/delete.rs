//! Delete Category Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use bookshelf_app::domain::categories::records::CategoryUuid;

use crate::{categories::errors::into_api_error, errors::ApiError, extensions::*, state::State};

/// Delete Category Handler
#[endpoint(
    tags("categories"),
    summary = "Delete Category",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Category deleted"),
    ),
)]
#[tracing::instrument(name = "categories.delete", skip_all, fields(category_uuid = %*category), err)]
pub(crate) async fn handler(
    category: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .categories
        .delete_category(CategoryUuid::from_uuid(category.into_inner()))
        .await
        .map_err(into_api_error)?;

    Ok(StatusCode::NO_CONTENT)
}
