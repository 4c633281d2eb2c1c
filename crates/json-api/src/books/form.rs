//! Multipart book form.

use std::str::FromStr;

use salvo::{http::form::FilePart, prelude::Request};
use tokio::fs;
use uuid::Uuid;

use bookshelf_app::{
    domain::{
        books::{
            data::{BookUpdate, NewBook},
            records::BookUuid,
        },
        categories::records::CategoryUuid,
        users::records::UserUuid,
    },
    storage::ImageUpload,
    validation::ValidationErrors,
};

use crate::{errors::ApiError, extensions::*};

pub(crate) const MAIN_IMAGE_FIELD: &str = "main_image";
pub(crate) const SUB_IMAGES_FIELD: &str = "sub_images";

/// Book fields as submitted, before required fields are enforced.
#[derive(Debug, Default)]
pub(crate) struct BookForm {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub stock: Option<u32>,
    pub category_uuid: Option<CategoryUuid>,
    pub main_image: Option<ImageUpload>,

    /// `None` when no sub image was sent.
    pub sub_images: Option<Vec<ImageUpload>>,
}

impl BookForm {
    /// Read text fields and uploaded files from a multipart or urlencoded body.
    pub(crate) async fn read(req: &mut Request) -> Result<Self, ApiError> {
        let mut errors = ValidationErrors::new();

        let title = req.form::<String>("title").await;
        let author = req.form::<String>("author").await;
        let description = req.form::<String>("description").await;

        let price = parse_field(
            &mut errors,
            req.form::<String>("price").await,
            "Price must be a whole number",
        );
        let stock = parse_field(
            &mut errors,
            req.form::<String>("stock").await,
            "Stock must be a whole number",
        );
        let category_uuid = parse_field::<Uuid>(
            &mut errors,
            req.form::<String>("category_uuid").await,
            "Category is not a valid id",
        )
        .map(CategoryUuid::from_uuid);

        let main_image = match req.file(MAIN_IMAGE_FIELD).await {
            Some(part) => Some(read_upload(part).await?),
            None => None,
        };

        let sub_images = match req.files(SUB_IMAGES_FIELD).await {
            Some(parts) => {
                let mut uploads = Vec::with_capacity(parts.len());

                for part in parts {
                    uploads.push(read_upload(part).await?);
                }

                Some(uploads)
            }
            None => None,
        };

        errors.into_result().map_err(ApiError::validation)?;

        Ok(Self {
            title,
            author,
            description,
            price,
            stock,
            category_uuid,
            main_image,
            sub_images,
        })
    }

    /// Enforce the fields a new book needs.
    pub(crate) fn into_new_book(self, uuid: BookUuid, owner: UserUuid) -> Result<NewBook, ApiError> {
        let mut errors = ValidationErrors::new();

        if self.price.is_none() {
            errors.push("Price is required");
        }

        if self.stock.is_none() {
            errors.push("Stock is required");
        }

        if self.category_uuid.is_none() {
            errors.push("Category is required");
        }

        let (Some(price), Some(stock), Some(category_uuid)) =
            (self.price, self.stock, self.category_uuid)
        else {
            return Err(ApiError::validation(errors));
        };

        Ok(NewBook {
            uuid,
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            price,
            stock,
            category_uuid,
            owner_uuid: owner,
            main_image: self.main_image,
            sub_images: self.sub_images.unwrap_or_default(),
        })
    }

    pub(crate) fn into_update(self) -> BookUpdate {
        BookUpdate {
            title: self.title,
            author: self.author,
            description: self.description,
            price: self.price,
            stock: self.stock,
            category_uuid: self.category_uuid,
            main_image: self.main_image,
            sub_images: self.sub_images,
        }
    }
}

/// Parse an optional text field. Blank values count as absent.
fn parse_field<T: FromStr>(
    errors: &mut ValidationErrors,
    value: Option<String>,
    message: &str,
) -> Option<T> {
    let value = value?;
    let value = value.trim();

    if value.is_empty() {
        return None;
    }

    match value.parse() {
        Ok(parsed) => Some(parsed),
        Err(_ignored) => {
            errors.push(message);

            None
        }
    }
}

async fn read_upload(part: &FilePart) -> Result<ImageUpload, ApiError> {
    let bytes = fs::read(part.path())
        .await
        .or_500("failed to read uploaded image")?;

    Ok(ImageUpload {
        file_name: part.name().unwrap_or("image").to_string(),
        content_type: part
            .content_type()
            .map(|mime| mime.essence_str().to_owned())
            .unwrap_or_default(),
        bytes,
    })
}
