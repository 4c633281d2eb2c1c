//! Update Category Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use bookshelf_app::domain::categories::{data::CategoryUpdate, records::CategoryUuid};

use crate::{
    categories::{errors::into_api_error, models::CategoryResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Update Category Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCategoryRequest {
    pub name: String,
}

/// Update Category Handler
#[endpoint(tags("categories"), summary = "Update Category", security(("bearer_auth" = [])))]
#[tracing::instrument(name = "categories.update", skip_all, fields(category_uuid = %*category), err)]
pub(crate) async fn handler(
    category: PathParam<Uuid>,
    json: JsonBody<UpdateCategoryRequest>,
    depot: &mut Depot,
) -> Result<Json<CategoryResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let category = state
        .app
        .categories
        .update_category(
            CategoryUuid::from_uuid(category.into_inner()),
            CategoryUpdate {
                name: json.into_inner().name,
            },
        )
        .await
        .map_err(into_api_error)?;

    Ok(Json(category.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use bookshelf_app::domain::categories::{CategoriesServiceError, MockCategoriesService};

    use crate::{
        errors::ErrorResponse,
        test_helpers::{Mocks, make_category},
    };

    use super::*;

    fn make_service(categories: MockCategoriesService) -> Service {
        Mocks {
            categories,
            ..Mocks::default()
        }
        .admin_service(Router::with_path("categories/{category}").patch(handler))
    }

    #[tokio::test]
    async fn test_rename_category() -> TestResult {
        let uuid = CategoryUuid::new();

        let mut categories = MockCategoriesService::new();

        categories
            .expect_update_category()
            .once()
            .withf(move |category, update| *category == uuid && update.name == "Fantasy")
            .return_once(move |_, update| Ok(make_category(uuid, &update.name)));

        let mut res = TestClient::patch(format!("http://example.com/categories/{uuid}"))
            .json(&json!({ "name": "Fantasy" }))
            .send(&make_service(categories))
            .await;

        let body: CategoryResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.name, "Fantasy");

        Ok(())
    }

    #[tokio::test]
    async fn test_rename_to_taken_name_returns_409() -> TestResult {
        let mut categories = MockCategoriesService::new();

        categories
            .expect_update_category()
            .once()
            .return_once(|_, _| Err(CategoriesServiceError::AlreadyExists));

        let mut res = TestClient::patch(format!("http://example.com/categories/{}", Uuid::now_v7()))
            .json(&json!({ "name": "Poetry" }))
            .send(&make_service(categories))
            .await;

        let body: ErrorResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
        assert_eq!(body.messages, ["Category already exists"]);

        Ok(())
    }
}
