//! Get Category Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use bookshelf_app::domain::categories::records::CategoryUuid;

use crate::{
    categories::{errors::into_api_error, models::CategoryResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Get Category Handler
#[endpoint(tags("categories"), summary = "Get Category")]
pub(crate) async fn handler(
    category: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<CategoryResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let category = state
        .app
        .categories
        .get_category(CategoryUuid::from_uuid(category.into_inner()))
        .await
        .map_err(into_api_error)?;

    Ok(Json(category.into()))
}
