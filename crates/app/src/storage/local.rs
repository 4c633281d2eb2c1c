//! Image storage on the local filesystem.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jiff::Timestamp;
use rand::Rng;
use tokio::fs;
use tracing::debug;

use crate::storage::{ImageStore, ImageUpload, StorageError};

/// Writes images into one directory served at `public_base_url`.
#[derive(Debug, Clone)]
pub struct LocalImageStore {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalImageStore {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_name_from_url<'a>(&self, url: &'a str) -> Option<&'a str> {
        let name = url
            .strip_prefix(self.public_base_url.as_str())?
            .strip_prefix('/')?;

        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
            && !name.starts_with('.');

        valid.then_some(name)
    }
}

fn sanitize(value: &str) -> String {
    value
        .to_lowercase()
        .replace(' ', "-")
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-')
        .collect()
}

/// Derive a unique, filesystem-safe name from the client's file name.
pub(crate) fn unique_file_name(original: &str, stamp: i64, nonce: u32) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let (stem, extension) = base.rsplit_once('.').unwrap_or((base, ""));

    let stem = sanitize(stem);
    let stem = if stem.is_empty() { "image".to_string() } else { stem };
    let extension = sanitize(extension).replace('-', "");

    if extension.is_empty() {
        format!("{stem}-{stamp}{nonce:05}")
    } else {
        format!("{stem}-{stamp}{nonce:05}.{extension}")
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    async fn store(&self, upload: ImageUpload) -> Result<String, StorageError> {
        let nonce = rand::thread_rng().gen_range(0..100_000);
        let name = unique_file_name(
            &upload.file_name,
            Timestamp::now().as_millisecond(),
            nonce,
        );

        fs::create_dir_all(&self.dir).await?;
        fs::write(self.dir.join(&name), &upload.bytes).await?;

        debug!(file = %name, bytes = upload.bytes.len(), "stored image");

        Ok(format!("{}/{name}", self.public_base_url))
    }

    async fn remove(&self, url: &str) -> Result<(), StorageError> {
        let name = self.file_name_from_url(url).ok_or(StorageError::ForeignUrl)?;

        match fs::remove_file(self.dir.join(name)).await {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}
