//! Books Data

use crate::{
    domain::{
        books::records::{BookUuid, ReviewUuid},
        categories::records::CategoryUuid,
        users::records::UserUuid,
    },
    storage::{ImageUpload, MAX_IMAGE_BYTES},
    validation::ValidationErrors,
};

/// Most secondary images a book may carry.
pub const MAX_SUB_IMAGES: usize = 4;

/// New Book Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub uuid: BookUuid,
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: u64,
    pub stock: u32,
    pub category_uuid: CategoryUuid,
    pub owner_uuid: UserUuid,
    pub main_image: Option<ImageUpload>,
    pub sub_images: Vec<ImageUpload>,
}

/// Book Update Data
///
/// Absent fields keep their stored value. Supplied images replace the old ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub price: Option<u64>,
    pub stock: Option<u32>,
    pub category_uuid: Option<CategoryUuid>,
    pub main_image: Option<ImageUpload>,
    pub sub_images: Option<Vec<ImageUpload>>,
}

/// Book listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookFilter {
    pub category: Option<CategoryUuid>,

    /// Case-insensitive match against title or author.
    pub search: Option<String>,
}

/// New Review Data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewReview {
    pub uuid: ReviewUuid,
    pub book_uuid: BookUuid,
    pub author_uuid: UserUuid,
    pub rating: u8,
    pub comment: String,
}

fn check_title(errors: &mut ValidationErrors, title: &str) {
    errors.check_length(
        title,
        1,
        200,
        "Title is required",
        "Title must be at most 200 characters",
    );
}

fn check_author(errors: &mut ValidationErrors, author: &str) {
    errors.check_length(
        author,
        1,
        100,
        "Author is required",
        "Author must be at most 100 characters",
    );
}

fn check_description(errors: &mut ValidationErrors, description: &str) {
    if description.trim().chars().count() > 2000 {
        errors.push("Description must be at most 2000 characters");
    }
}

fn check_image(errors: &mut ValidationErrors, label: &str, image: &ImageUpload) {
    if !image.content_type.starts_with("image/") {
        errors.push(format!("{label} must be an image"));
    }

    if image.bytes.is_empty() {
        errors.push(format!("{label} is empty"));
    } else if image.bytes.len() > MAX_IMAGE_BYTES {
        errors.push(format!("{label} must be at most 1 MB"));
    }
}

fn check_sub_images(errors: &mut ValidationErrors, images: &[ImageUpload]) {
    if images.len() > MAX_SUB_IMAGES {
        errors.push(format!("At most {MAX_SUB_IMAGES} sub images are allowed"));
    }

    for image in images {
        check_image(errors, "Sub image", image);
    }
}

impl NewBook {
    /// # Errors
    ///
    /// Returns every rule the payload breaks.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        check_title(&mut errors, &self.title);
        check_author(&mut errors, &self.author);
        check_description(&mut errors, &self.description);

        match &self.main_image {
            Some(image) => check_image(&mut errors, "Main image", image),
            None => errors.push("Main image is required"),
        }

        check_sub_images(&mut errors, &self.sub_images);

        errors.into_result()
    }
}

impl BookUpdate {
    /// # Errors
    ///
    /// Returns every rule the supplied fields break.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Some(title) = &self.title {
            check_title(&mut errors, title);
        }

        if let Some(author) = &self.author {
            check_author(&mut errors, author);
        }

        if let Some(description) = &self.description {
            check_description(&mut errors, description);
        }

        if let Some(image) = &self.main_image {
            check_image(&mut errors, "Main image", image);
        }

        if let Some(images) = &self.sub_images {
            check_sub_images(&mut errors, images);
        }

        errors.into_result()
    }
}

impl NewReview {
    /// # Errors
    ///
    /// Returns every rule the review breaks.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if !(1..=5).contains(&self.rating) {
            errors.push("Rating must be between 1 and 5");
        }

        errors.check_length(
            &self.comment,
            1,
            500,
            "Comment is required",
            "Comment must be at most 500 characters",
        );

        errors.into_result()
    }
}
