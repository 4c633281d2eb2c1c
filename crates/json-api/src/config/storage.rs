//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Uploaded image settings.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory uploaded images are written to
    #[arg(long, env = "IMAGE_DIR", default_value = "./uploads")]
    pub image_dir: PathBuf,

    /// Public URL prefix of the image directory
    #[arg(long, env = "IMAGE_BASE_URL", default_value = "http://localhost:8698/images")]
    pub image_base_url: String,
}
